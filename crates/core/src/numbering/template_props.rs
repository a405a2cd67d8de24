//! Property-based tests for template rendering.

use chrono::NaiveDate;
use proptest::prelude::*;

use crate::numbering::template::CodeTemplate;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A zero-run placeholder renders the counter padded to the run length.
    #[test]
    fn prop_zero_run_padding(width in 1usize..10, number in 0i64..1_000_000_000) {
        let template = format!("P-{{{}}}", "0".repeat(width));
        let rendered = CodeTemplate::new(&template)
            .render(number, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        let digits = rendered.trim_start_matches("P-");
        prop_assert!(digits.len() >= width);
        prop_assert_eq!(digits.parse::<i64>().unwrap(), number);
    }

    /// Distinct counters always render to distinct codes.
    #[test]
    fn prop_distinct_numbers_distinct_codes(a in 0i64..100_000, b in 0i64..100_000) {
        prop_assume!(a != b);
        let template = CodeTemplate::new("DOC-{YYYY}-{0000}");
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        prop_assert_ne!(template.render(a, date), template.render(b, date));
    }
}
