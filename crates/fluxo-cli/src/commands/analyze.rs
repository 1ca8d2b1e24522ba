//! Expense analysis: category chart and recommendations

use std::path::Path;

use anyhow::Result;
use fluxo_core::{
    aggregate::{aggregate, total_expenses},
    recommend::{auto_insurance_offer, insurance_offer_recommendation, recommend},
    Pipeline,
};

use super::{classifier_from_env, format_amount, open_store};

const BAR_WIDTH: usize = 32;

pub async fn cmd_analyze(db: &Path, user: &str) -> Result<()> {
    let store = open_store(db)?;
    let pipeline = Pipeline::new(store, classifier_from_env());

    // Settle enrichment first so the chart reflects categorized data;
    // classifier failures fall back to the sentinel category and are still
    // counted.
    let view = pipeline.run_until_settled(user).await?;
    let totals = aggregate(&view);

    println!("Análise de Despesas");
    println!();

    if totals.is_empty() {
        println!("Não há dados de despesas para exibir o gráfico.");
    } else {
        let max = totals[0].value;
        for total in &totals {
            let width = if max > 0.0 {
                ((total.value / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            println!(
                "{:<12} {:<width$} {}",
                total.name,
                "█".repeat(width.max(1)),
                format_amount(total.value),
                width = BAR_WIDTH
            );
        }
        println!();
        println!("Total: {}", format_amount(total_expenses(&totals)));
    }

    println!();
    println!("Recomendações para Você");
    println!();

    let mut recommendations = recommend(&totals);
    if auto_insurance_offer(&totals) {
        recommendations.push(insurance_offer_recommendation());
    }

    for recommendation in &recommendations {
        println!("• {}", recommendation.title);
        println!("  {}", recommendation.text);
    }

    Ok(())
}
