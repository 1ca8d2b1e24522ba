//! Rule-table classifier backend
//!
//! In-process port of the hosted classification function: keyword tables per
//! category, a special case for Pix transfers, and a generic cleanup fallback.
//! Doubles as the mock backend for tests, with failure injection, artificial
//! latency, and an invocation counter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use crate::error::{Error, Result};
use crate::models::{Classification, FALLBACK_CATEGORY};

use super::Classifier;

/// Keyword tables, checked in order; the first matching keyword wins.
const CATEGORY_RULES: &[(&str, &[&str])] = &[
    (
        "Transporte",
        &[
            "uber",
            "99",
            "rappi",
            "lime",
            "cittamobi",
            "posto",
            "gasolina",
            "estacionamento",
        ],
    ),
    (
        "Alimentação",
        &[
            "ifood",
            "rappi",
            "mcdonalds",
            "bk",
            "burger king",
            "restaurante",
            "padaria",
            "supermercado",
            "mercearia",
        ],
    ),
    (
        "Compras",
        &[
            "amazon",
            "mercado livre",
            "shopee",
            "shein",
            "cea",
            "renner",
            "magazine luiza",
            "americanas",
        ],
    ),
    (
        "Saúde",
        &[
            "farmacia",
            "drogaria",
            "unimed",
            "bradesco saude",
            "plano de saude",
            "medico",
        ],
    ),
    (
        "Moradia",
        &["aluguel", "condominio", "enel", "sabesp", "internet", "iptu"],
    ),
    (
        "Lazer",
        &[
            "spotify", "netflix", "hbo", "disney+", "cinema", "show", "ingresso", "bar", "evento",
        ],
    ),
    ("Educação", &["udemy", "curso", "faculdade", "escola"]),
    ("Pix", &["pix"]),
];

/// Rule-based classifier
///
/// Mirrors the remote service's behavior so the pipeline can run without a
/// network. Test-only knobs are plain fields set by the constructors.
#[derive(Clone, Default)]
pub struct RuleClassifier {
    /// Whether health_check should return true
    healthy: bool,
    /// Inject a `ClassificationError` on every call
    fail: bool,
    /// Artificial delay before answering
    latency: Option<Duration>,
    /// Number of classify invocations observed
    calls: Arc<AtomicUsize>,
}

impl RuleClassifier {
    /// Create a new rule classifier (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            fail: false,
            latency: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create an unhealthy backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Create a backend that fails every classify call
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Create a backend that waits before answering
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::new()
        }
    }

    /// Number of classify invocations observed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn classify_inner(raw_description: &str) -> Result<Classification> {
        if raw_description.is_empty() {
            // The hosted function rejects empty input; mirror that.
            return Err(Error::Classification(
                "raw_description must not be empty".to_string(),
            ));
        }

        let lower = raw_description.to_lowercase();

        // Pix transfers carry the counterpart name after the keyword.
        if lower.contains("pix") {
            let mut clean = "Transação Pix".to_string();
            if let Ok(re) = Regex::new(r"pix[\s\-]*[a-zA-Z]*[\s\-]*([a-zA-Z\s.]+)") {
                if let Some(caps) = re.captures(&lower) {
                    let name = caps[1]
                        .trim()
                        .replace("recebida", "")
                        .replace("enviado", "");
                    let name = name.trim();
                    if name.len() > 3 {
                        clean = title_case(name);
                    }
                }
            }
            return Ok(Classification {
                category: "Pix".to_string(),
                clean_description: clean,
            });
        }

        for (category, keywords) in CATEGORY_RULES {
            for keyword in *keywords {
                if lower.contains(keyword) {
                    return Ok(Classification {
                        category: (*category).to_string(),
                        clean_description: clean_description(raw_description, keyword),
                    });
                }
            }
        }

        // Nothing matched: pick the most relevant trailing token.
        let clean = Regex::new(r"[\*\- ]")
            .ok()
            .and_then(|re| {
                let parts: Vec<&str> = re.split(raw_description).collect();
                parts
                    .into_iter()
                    .rev()
                    .map(str::trim)
                    .find(|part| part.len() >= 4)
                    .map(title_case)
            })
            .unwrap_or_else(|| title_case(raw_description.trim()));

        Ok(Classification {
            category: FALLBACK_CATEGORY.to_string(),
            clean_description: clean,
        })
    }
}

/// Extract a humanized description from the text after the matched keyword.
///
/// Ex: "PGTO *UBER DO BRASIL TEC" with keyword "uber" -> "Uber Do Brasil Tec"
fn clean_description(raw_description: &str, keyword: &str) -> String {
    let pattern = format!(r"(?i)[\*\- ]\s*({}[a-zA-Z0-9 .]*)", regex::escape(keyword));
    if let Ok(re) = Regex::new(&pattern) {
        if let Some(caps) = re.captures(raw_description) {
            let matched = caps[1].trim();
            if matched.len() > 3 {
                return title_case(matched);
            }
        }
    }
    capitalize(keyword)
}

/// "uber do brasil" -> "Uber Do Brasil"
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First character uppercased, the rest lowercased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[async_trait]
impl Classifier for RuleClassifier {
    async fn classify(&self, raw_description: &str) -> Result<Classification> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.fail {
            return Err(Error::Classification("injected failure".to_string()));
        }

        Self::classify_inner(raw_description)
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn host(&self) -> &str {
        "rules://local"
    }
}
