//! Property-based tests for the entry balance invariant.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::account::NormalSide;
use super::error::LedgerError;
use super::validation::{EntryTotals, validate_balance};

/// Strategy to generate signed amounts (-1,000,000.00 to 1,000,000.00).
fn signed_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a normal side.
fn side_strategy() -> impl Strategy<Value = NormalSide> {
    prop_oneof![Just(NormalSide::Debit), Just(NormalSide::Credit)]
}

/// Strategy to generate arbitrary side-tagged lines.
fn lines_strategy() -> impl Strategy<Value = Vec<(NormalSide, Decimal)>> {
    prop::collection::vec((side_strategy(), signed_amount()), 1..12)
}

/// Appends the single line that closes the gap between both sides.
fn close_entry(mut lines: Vec<(NormalSide, Decimal)>) -> Vec<(NormalSide, Decimal)> {
    let totals = EntryTotals::from_lines(lines.iter().copied());
    lines.push((NormalSide::Credit, totals.difference()));
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any line set closed by a balancing credit validates.
    #[test]
    fn prop_closed_entries_balance(lines in lines_strategy()) {
        let closed = close_entry(lines);
        let totals = validate_balance(&closed).unwrap();
        prop_assert_eq!(totals.debit, totals.credit);
    }

    /// A non-zero nudge to any balanced entry breaks it by exactly that amount.
    #[test]
    fn prop_nudged_entries_report_difference(
        lines in lines_strategy(),
        nudge in signed_amount().prop_filter("non-zero", |d| !d.is_zero()),
    ) {
        let mut closed = close_entry(lines);
        closed.push((NormalSide::Debit, nudge));

        match validate_balance(&closed) {
            Err(LedgerError::UnbalancedEntry { difference, .. }) => {
                prop_assert_eq!(difference, nudge);
            }
            other => prop_assert!(false, "expected UnbalancedEntry, got {:?}", other),
        }
    }

    /// Negating every line keeps a balanced entry balanced.
    #[test]
    fn prop_negated_entry_still_balances(lines in lines_strategy()) {
        let negated: Vec<_> = close_entry(lines)
            .into_iter()
            .map(|(side, value)| (side, -value))
            .collect();
        prop_assert!(validate_balance(&negated).is_ok());
    }

    /// Line order never affects the outcome.
    #[test]
    fn prop_order_independent(lines in lines_strategy()) {
        let forward = EntryTotals::from_lines(lines.iter().copied());
        let backward = EntryTotals::from_lines(lines.iter().rev().copied());
        prop_assert_eq!(forward, backward);
    }
}
