//! Recommendation generator
//!
//! Derives advisory messages from the spending aggregation: one data-driven
//! entry naming the dominant category, followed by two fixed entries, in that
//! order. A promotional auto-insurance offer is derived separately from the
//! transport share of spend.

use crate::aggregate::total_expenses;
use crate::models::{CategoryTotal, Recommendation, RecommendationKind};

/// Transport share of total spend above which the insurance offer shows.
const INSURANCE_TRANSPORT_SHARE: f64 = 0.30;

/// Generate recommendations from an aggregation pass
///
/// The data-driven entry reports the top category's percentage of total
/// outbound spend, rounded to the nearest integer. When the total is zero
/// the entry is omitted entirely rather than rendering a meaningless
/// percentage. The two static entries are always present, in fixed order.
pub fn recommend(aggregation: &[CategoryTotal]) -> Vec<Recommendation> {
    let mut recommendations = Vec::with_capacity(3);

    let total = total_expenses(aggregation);
    if let Some(top) = aggregation.first() {
        if total > 0.0 {
            let percentage = (top.value / total * 100.0).round() as i64;
            recommendations.push(Recommendation {
                kind: RecommendationKind::TopCategory,
                title: format!("Atenção aos gastos com {}!", top.name),
                text: format!(
                    "Você gastou cerca de {}% do total de suas despesas nesta categoria. \
                     Que tal rever alguns custos?",
                    percentage
                ),
            });
        }
    }

    recommendations.push(Recommendation {
        kind: RecommendationKind::Investing,
        title: "Comece a investir".to_string(),
        text: "Mesmo pequenas quantias podem crescer com o tempo. Explore opções de \
               investimento de baixo risco para iniciar."
            .to_string(),
    });

    recommendations.push(Recommendation {
        kind: RecommendationKind::EmergencyFund,
        title: "Crie uma reserva de emergência".to_string(),
        text: "Guarde um pouco a cada mês para cobrir despesas inesperadas. O ideal é \
               ter o equivalente a 3-6 meses de seus custos."
            .to_string(),
    });

    recommendations
}

/// Whether the auto-insurance offer should be shown
///
/// True when the Transporte category exceeds 30% of total outbound spend.
pub fn auto_insurance_offer(aggregation: &[CategoryTotal]) -> bool {
    let total = total_expenses(aggregation);
    if total == 0.0 {
        return false;
    }

    aggregation
        .iter()
        .find(|t| t.name == "Transporte")
        .map(|t| t.value / total > INSURANCE_TRANSPORT_SHARE)
        .unwrap_or(false)
}

/// The promotional recommendation rendered when the offer applies
pub fn insurance_offer_recommendation() -> Recommendation {
    Recommendation {
        kind: RecommendationKind::InsuranceOffer,
        title: "Oferta Especial!".to_string(),
        text: "Seguro Auto com 20% de desconto para você!".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(entries: &[(&str, f64)]) -> Vec<CategoryTotal> {
        entries
            .iter()
            .map(|(name, value)| CategoryTotal {
                name: name.to_string(),
                value: *value,
            })
            .collect()
    }

    #[test]
    fn test_top_category_percentage() {
        let aggregation = totals(&[("Alimentação", 100.0), ("Transporte", 50.0)]);
        let recommendations = recommend(&aggregation);

        assert_eq!(recommendations.len(), 3);
        assert_eq!(recommendations[0].kind, RecommendationKind::TopCategory);
        assert!(recommendations[0].title.contains("Alimentação"));
        // 100 / 150 = 66.67%, rounded to nearest integer.
        assert!(recommendations[0].text.contains("67%"));
    }

    #[test]
    fn test_static_entries_always_present_in_order() {
        let recommendations = recommend(&[]);
        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0].kind, RecommendationKind::Investing);
        assert_eq!(recommendations[1].kind, RecommendationKind::EmergencyFund);
    }

    #[test]
    fn test_zero_total_omits_data_driven_entry() {
        let aggregation = totals(&[("Alimentação", 0.0)]);
        let recommendations = recommend(&aggregation);

        assert_eq!(recommendations.len(), 2);
        assert!(recommendations
            .iter()
            .all(|r| r.kind != RecommendationKind::TopCategory));
    }

    #[test]
    fn test_percentage_within_bounds() {
        let cases = vec![
            totals(&[("A", 1.0)]),
            totals(&[("A", 99.0), ("B", 1.0)]),
            totals(&[("A", 0.5), ("B", 0.5), ("C", 0.5)]),
        ];

        for aggregation in cases {
            let recommendations = recommend(&aggregation);
            let text = &recommendations[0].text;
            let percentage: i64 = text
                .split('%')
                .next()
                .and_then(|s| s.split_whitespace().last())
                .and_then(|s| s.parse().ok())
                .unwrap();
            assert!((0..=100).contains(&percentage), "got {}%", percentage);
        }
    }

    #[test]
    fn test_insurance_offer_requires_transport_share() {
        // 50 / 150 = 33% > 30%: offer shows.
        let heavy = totals(&[("Alimentação", 100.0), ("Transporte", 50.0)]);
        assert!(auto_insurance_offer(&heavy));

        // 20 / 120 = 17%: no offer.
        let light = totals(&[("Alimentação", 100.0), ("Transporte", 20.0)]);
        assert!(!auto_insurance_offer(&light));

        assert!(!auto_insurance_offer(&[]));
        assert!(!auto_insurance_offer(&totals(&[("Transporte", 0.0)])));
    }
}
