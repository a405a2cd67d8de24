//! Fallback codes used when no active template is registered.

/// Template domain of stock journal codes.
pub const JOURNAL_DOMAIN: &str = "stock";

/// Template type of stock journal codes.
pub const JOURNAL_TYPE: &str = "journal_stock";

/// Prefix of fallback journal codes.
pub const JOURNAL_PREFIX: &str = "JST";

/// Fallback prefix of a document: first letter of the domain and first
/// three letters of the type, upper-cased (`sale`/`invoice` → `SINV`).
#[must_use]
pub fn document_prefix(domain: &str, document_type: &str) -> String {
    domain
        .chars()
        .take(1)
        .chain(document_type.chars().take(3))
        .collect::<String>()
        .to_uppercase()
}

/// Formats `PREFIX-YYYY-NNNN`.
#[must_use]
pub fn fallback_code(prefix: &str, year: i32, count: u64, padding: usize) -> String {
    format!("{prefix}-{year}-{count:0>padding$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_prefix() {
        assert_eq!(document_prefix("sale", "invoice"), "SINV");
        assert_eq!(document_prefix("purchase", "receipt"), "PREC");
        assert_eq!(document_prefix("stock", "adjustment"), "SADJ");
        assert_eq!(document_prefix("sale", "re"), "SRE");
    }

    #[test]
    fn test_fallback_code() {
        assert_eq!(fallback_code(JOURNAL_PREFIX, 2026, 1, 4), "JST-2026-0001");
        assert_eq!(fallback_code("SINV", 2026, 12345, 4), "SINV-2026-12345");
    }
}
