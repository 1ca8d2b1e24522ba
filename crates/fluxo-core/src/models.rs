//! Domain models for Fluxo

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel category for transactions the classifier could not place.
pub const FALLBACK_CATEGORY: &str = "Outros";

/// Category shown for inbound transactions regardless of classifier output.
pub const INCOME_CATEGORY: &str = "Salário";

/// Opening balance applied before summing the statement.
pub const OPENING_BALANCE: f64 = 3000.0;

/// Direction of funds flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money entering the account
    In,
    /// Money leaving the account
    Out,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A statement transaction
///
/// `raw_description` is immutable once created; `category` and
/// `clean_description` are filled in exactly once by enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    /// Opaque owner identifier supplied by the identity provider
    pub user_id: String,
    /// Free-text description as originally recorded
    pub raw_description: String,
    /// Signed amount; sign is informational only (see `kind`)
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub kind: TransactionKind,
    /// Assigned by enrichment; absent means "not yet classified"
    pub category: Option<String>,
    /// Assigned together with `category`
    pub clean_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// A transaction is enriched iff both classifier fields are present.
    pub fn is_enriched(&self) -> bool {
        self.category.is_some() && self.clean_description.is_some()
    }
}

/// Input record for the bulk seed operation; the store assigns ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSeed {
    pub raw_description: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub kind: TransactionKind,
}

/// Result of classifying a raw description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Category label (e.g., "Transporte", "Lazer")
    pub category: String,
    /// Humanized description (e.g., "Uber Do Brasil Tec" from
    /// "PGTO *UBER DO BRASIL TEC")
    pub clean_description: String,
}

/// Spending total for one category, derived per aggregation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    /// Sum of absolute amounts of all outbound transactions in the category
    pub value: f64,
}

/// Kind of advisory message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Data-driven: names the dominant spending category
    TopCategory,
    /// Static investing advice
    Investing,
    /// Static emergency-reserve advice
    EmergencyFund,
    /// Promotional insurance offer triggered by transport spend
    InsuranceOffer,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopCategory => "top_category",
            Self::Investing => "investing",
            Self::EmergencyFund => "emergency_fund",
            Self::InsuranceOffer => "insurance_offer",
        }
    }
}

/// An advisory message derived from the spending aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub text: String,
}

/// Demonstration records used to populate an empty account.
///
/// Dates are expressed relative to `now` so the seeded feed always looks
/// recent, mirroring the reference data (7 records covering both kinds).
pub fn seed_catalog(now: DateTime<Utc>) -> Vec<TransactionSeed> {
    vec![
        TransactionSeed {
            raw_description: "PGTO *UBER DO BRASIL TEC".to_string(),
            amount: -24.90,
            date: now,
            kind: TransactionKind::Out,
        },
        TransactionSeed {
            raw_description: "TRANSF PIX RECEBIDA - JOAO SILVA".to_string(),
            amount: 150.00,
            date: now - Duration::days(1),
            kind: TransactionKind::In,
        },
        TransactionSeed {
            raw_description: "COMPRA CARTAO - PADARIA ESTRELA".to_string(),
            amount: -12.50,
            date: now - Duration::days(2),
            kind: TransactionKind::Out,
        },
        TransactionSeed {
            raw_description: "PAGAMENTO BOLETO - ALUGUEL IMOB".to_string(),
            amount: -1200.00,
            date: now - Duration::days(3),
            kind: TransactionKind::Out,
        },
        TransactionSeed {
            raw_description: "COMPRA MKTPLACE - AMAZON SERV".to_string(),
            amount: -189.90,
            date: now - Duration::days(4),
            kind: TransactionKind::Out,
        },
        TransactionSeed {
            raw_description: "NETFLIX streaming".to_string(),
            amount: -39.90,
            date: now - Duration::days(5),
            kind: TransactionKind::Out,
        },
        TransactionSeed {
            raw_description: "FARMACIA SAO PAULO".to_string(),
            amount: -55.40,
            date: now - Duration::days(6),
            kind: TransactionKind::Out,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        assert_eq!("out".parse::<TransactionKind>().unwrap(), TransactionKind::Out);
        assert_eq!(TransactionKind::In.as_str(), "in");
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_is_enriched_requires_both_fields() {
        let mut tx = Transaction {
            id: 1,
            user_id: "u1".to_string(),
            raw_description: "NETFLIX streaming".to_string(),
            amount: -39.90,
            date: Utc::now(),
            kind: TransactionKind::Out,
            category: Some("Lazer".to_string()),
            clean_description: None,
            created_at: Utc::now(),
        };
        assert!(!tx.is_enriched());

        tx.clean_description = Some("Netflix".to_string());
        assert!(tx.is_enriched());
    }

    #[test]
    fn test_seed_catalog_shape() {
        let seeds = seed_catalog(Utc::now());
        assert_eq!(seeds.len(), 7);
        assert_eq!(
            seeds
                .iter()
                .filter(|s| s.kind == TransactionKind::In)
                .count(),
            1
        );
    }
}
