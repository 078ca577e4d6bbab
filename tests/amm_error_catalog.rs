use std::collections::HashSet;

use precision_amm::amm::error::AmmError;
use precision_amm::amm::error_catalog::{default_locale_message, AmmErrorCode, ErrorKind};

#[test]
fn all_codes_are_unique() {
    let mut seen = HashSet::new();
    for code in AmmErrorCode::all() {
        assert!(seen.insert(code.code()));
    }
    assert_eq!(seen.len(), AmmErrorCode::all().len());
}

#[test]
fn all_messages_nonempty() {
    for code in AmmErrorCode::all() {
        let message = code.message_pt().trim();
        assert!(!message.is_empty(), "{} message should not be empty", code.code());
        assert!(!code.title().trim().is_empty());
    }
}

#[test]
fn exhaustive_all_slice() {
    assert_eq!(AmmErrorCode::all().len(), 6);
}

#[test]
fn kinds_split_input_from_arithmetic() {
    assert_eq!(AmmErrorCode::InvalidFeeBps.kind(), ErrorKind::InvalidInput);
    assert_eq!(AmmErrorCode::ZeroReserve.kind(), ErrorKind::InvalidInput);
    assert_eq!(AmmErrorCode::OverflowNumeric.kind(), ErrorKind::Overflow);
    assert_eq!(AmmErrorCode::SqrtNoConvergence.kind(), ErrorKind::Internal);
}

#[test]
fn format_examples_resolve_placeholders() {
    let err = AmmError::new(AmmErrorCode::InvalidFeeBps).with_context("fee_bps", 12_000);
    let user = err.to_user_string();
    assert_eq!(user, "[AMM-0001] fee_bps=12000 fora de [0, 10000]");
    let json = err.to_log_json();
    assert!(json.contains("\"context\":{\"fee_bps\":\"12000\"}"));
    assert_eq!(default_locale_message(AmmErrorCode::ZeroReserve), "reserve deve ser > 0");
}
