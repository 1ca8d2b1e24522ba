//! Static category presentation metadata
//!
//! Maps category labels to display metadata for list rendering. Unknown
//! labels fall back to the sentinel entry; inbound transactions always
//! render as income regardless of classifier output.

use crate::models::{TransactionKind, FALLBACK_CATEGORY, INCOME_CATEGORY};

/// Presentation metadata for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMeta {
    /// Label shown next to the transaction
    pub label: &'static str,
    /// Stable identifier for styling
    pub slug: &'static str,
    /// Display symbol for terminal output
    pub symbol: &'static str,
}

const METADATA: &[CategoryMeta] = &[
    CategoryMeta { label: "Transporte", slug: "transport", symbol: "🚗" },
    CategoryMeta { label: "Alimentação", slug: "food", symbol: "🍽" },
    CategoryMeta { label: "Compras", slug: "shopping", symbol: "🛍" },
    CategoryMeta { label: "Saúde", slug: "health", symbol: "💊" },
    CategoryMeta { label: "Moradia", slug: "housing", symbol: "🏠" },
    CategoryMeta { label: "Lazer", slug: "leisure", symbol: "🎬" },
    CategoryMeta { label: "Educação", slug: "education", symbol: "📚" },
    CategoryMeta { label: "Pix", slug: "pix", symbol: "⚡" },
    CategoryMeta { label: FALLBACK_CATEGORY, slug: "others", symbol: "💲" },
    CategoryMeta { label: INCOME_CATEGORY, slug: "income", symbol: "↙" },
];

/// Look up display metadata for a transaction's category
///
/// Inbound transactions map to the income entry; unknown or missing
/// categories map to the fallback entry.
pub fn category_meta(category: Option<&str>, kind: TransactionKind) -> &'static CategoryMeta {
    if kind == TransactionKind::In {
        return lookup(INCOME_CATEGORY);
    }
    category.map(lookup).unwrap_or_else(|| lookup(FALLBACK_CATEGORY))
}

static OTHERS: CategoryMeta = CategoryMeta {
    label: FALLBACK_CATEGORY,
    slug: "others",
    symbol: "💲",
};

fn lookup(label: &str) -> &'static CategoryMeta {
    METADATA.iter().find(|m| m.label == label).unwrap_or(&OTHERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_category() {
        let meta = category_meta(Some("Transporte"), TransactionKind::Out);
        assert_eq!(meta.slug, "transport");
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let meta = category_meta(Some("Criptomoedas"), TransactionKind::Out);
        assert_eq!(meta.slug, "others");

        let meta = category_meta(None, TransactionKind::Out);
        assert_eq!(meta.slug, "others");
    }

    #[test]
    fn test_inbound_always_renders_as_income() {
        let meta = category_meta(Some("Lazer"), TransactionKind::In);
        assert_eq!(meta.slug, "income");
        assert_eq!(meta.label, "Salário");
    }
}
