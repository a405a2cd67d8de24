//! Property-based tests for the document lifecycle.

use proptest::prelude::*;
use stockflow_shared::types::UserId;
use uuid::Uuid;

use crate::document::error::DocumentError;
use crate::document::lifecycle::DocumentLifecycle;
use crate::document::types::{DocumentStatus, LifecycleAction};

/// Strategy for generating random DocumentStatus values.
fn arb_status() -> impl Strategy<Value = DocumentStatus> {
    prop_oneof![
        Just(DocumentStatus::Draft),
        Just(DocumentStatus::Validated),
        Just(DocumentStatus::Cancelled),
        Just(DocumentStatus::Completed),
        Just(DocumentStatus::Archived),
    ]
}

/// Strategy for generating random user ids.
fn arb_user() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from_uuid(Uuid::from_u128(n)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Only drafts can be validated; the validator is recorded.
    #[test]
    fn prop_validate_only_from_draft(status in arb_status(), user in arb_user()) {
        let result = DocumentLifecycle::validate(status, user);
        if status == DocumentStatus::Draft {
            let action = result.unwrap();
            prop_assert_eq!(action.new_status(), DocumentStatus::Validated);
            let is_recorded = matches!(
                action,
                LifecycleAction::Validate { validated_by, .. } if validated_by == user
            );
            prop_assert!(is_recorded);
        } else {
            let is_state_error = matches!(
                result,
                Err(DocumentError::InvalidState { current, .. }) if current == status
            );
            prop_assert!(is_state_error);
        }
    }

    /// Cancel succeeds from every status except Cancelled, and a second cancel fails.
    #[test]
    fn prop_cancel_is_single_shot(
        status in arb_status(),
        user in arb_user(),
        reverse in any::<bool>(),
    ) {
        let first = DocumentLifecycle::cancel(status, user, reverse);
        if status == DocumentStatus::Cancelled {
            prop_assert!(first.is_err());
        } else {
            let action = first.unwrap();
            let after = action.new_status();
            prop_assert_eq!(after, DocumentStatus::Cancelled);
            prop_assert!(DocumentLifecycle::cancel(after, user, reverse).is_err());
        }
    }

    /// Reversal is requested only when enabled and the document had stock impact.
    #[test]
    fn prop_reversal_requires_stock_impact(
        status in arb_status(),
        user in arb_user(),
        reverse in any::<bool>(),
    ) {
        if let Ok(LifecycleAction::Cancel { reverse_stock, .. }) =
            DocumentLifecycle::cancel(status, user, reverse)
        {
            prop_assert_eq!(reverse_stock, reverse && status.has_stock_impact());
        }
    }
}
