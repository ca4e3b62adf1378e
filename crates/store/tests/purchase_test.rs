//! Integration tests for purchase reconciliation.
//!
//! Each purchase owns one stock lot and one payment or payable entry; every
//! command either applies completely or leaves no trace.

mod common;

use common::Books;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use stockbook_core::ledger::EntrySource;
use stockbook_core::store::StoreRead;
use stockbook_shared::AppError;
use stockbook_shared::types::{CostingMethod, ProductId, PurchaseId};

// ============================================================================
// Create
// ============================================================================

#[test]
fn test_paid_purchase_posts_payment_entry() {
    let books = Books::new(CostingMethod::Fifo);
    let purchase = books.buy(dec!(5), dec!(155.75));

    assert_eq!(purchase.price(), dec!(778.75));
    assert_eq!(books.balance(books.inventory), dec!(778.75));
    assert_eq!(books.balance(books.cash), dec!(-778.75));
    assert_eq!(books.balance(books.payable), Decimal::ZERO);
    assert_eq!(books.on_hand(books.product), dec!(5));

    let entry = books.bk.entry(books.company.id, purchase.entry_id).unwrap();
    assert_eq!(
        entry.source,
        Some(EntrySource::PurchasePayment { purchase_id: purchase.id })
    );
    assert_eq!(entry.transactions.len(), 2);
    books.assert_all_entries_balanced();
}

#[test]
fn test_unpaid_purchase_posts_payable_entry() {
    let books = Books::new(CostingMethod::Fifo);
    let input = books.purchase_input(books.product, dec!(5), dec!(155.75), false);
    let purchase = books.bk.create_purchase(books.company.id, input).unwrap();

    assert_eq!(books.balance(books.inventory), dec!(778.75));
    assert_eq!(books.balance(books.payable), dec!(778.75));
    assert_eq!(books.balance(books.cash), Decimal::ZERO);

    let entry = books.bk.entry(books.company.id, purchase.entry_id).unwrap();
    assert_eq!(
        entry.source,
        Some(EntrySource::PurchasePayable { purchase_id: purchase.id })
    );
    books.assert_all_entries_balanced();
}

#[test]
fn test_missing_settlement_account_writes_nothing() {
    let books = Books::new(CostingMethod::Fifo);
    let entries = books.entry_count();

    let mut input = books.purchase_input(books.product, dec!(5), dec!(10), true);
    input.payment_account = None;
    let err = books.bk.create_purchase(books.company.id, input).unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m.contains("payment")));

    let mut input = books.purchase_input(books.product, dec!(5), dec!(10), false);
    input.payable_account = None;
    let err = books.bk.create_purchase(books.company.id, input).unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m.contains("payable")));

    assert_eq!(books.entry_count(), entries);
    assert_eq!(books.on_hand(books.product), Decimal::ZERO);
}

#[test]
fn test_unknown_product_is_not_found() {
    let books = Books::new(CostingMethod::Fifo);
    let input = books.purchase_input(ProductId::new(), dec!(1), dec!(1), true);

    let err = books.bk.create_purchase(books.company.id, input).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(books.entry_count(), 0);
}

#[test]
fn test_non_positive_quantity_rejected() {
    let books = Books::new(CostingMethod::Fifo);
    let input = books.purchase_input(books.product, Decimal::ZERO, dec!(1), true);

    let err = books.bk.create_purchase(books.company.id, input).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(books.entry_count(), 0);
}

#[test]
fn test_retired_product_accepts_no_purchase() {
    let books = Books::new(CostingMethod::Fifo);
    books.buy(dec!(3), dec!(2));
    books.bk.retire_product(books.company.id, books.product).unwrap();

    let input = books.purchase_input(books.product, dec!(1), dec!(1), true);
    let err = books.bk.create_purchase(books.company.id, input).unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    // Stock already on hand can still be sold.
    books.sell(dec!(3), dec!(5)).unwrap();
    assert_eq!(books.on_hand(books.product), Decimal::ZERO);
}

// ============================================================================
// Update
// ============================================================================

#[test]
fn test_toggle_paid_to_unpaid_moves_settlement() {
    let books = Books::new(CostingMethod::Fifo);
    let purchase = books.buy(dec!(5), dec!(155.75));

    let input = books.purchase_input(books.product, dec!(5), dec!(155.75), false);
    let updated = books
        .bk
        .update_purchase(books.company.id, purchase.id, input)
        .unwrap();

    assert_eq!(books.balance(books.cash), Decimal::ZERO);
    assert_eq!(books.balance(books.payable), dec!(778.75));
    assert_eq!(books.balance(books.inventory), dec!(778.75));

    assert_ne!(updated.entry_id, purchase.entry_id);
    let err = books.bk.entry(books.company.id, purchase.entry_id).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(books.entry_count(), 1);
    books.assert_all_entries_balanced();
}

#[test]
fn test_toggle_back_to_paid() {
    let books = Books::new(CostingMethod::Fifo);
    let purchase = books.buy(dec!(5), dec!(155.75));
    let id = books.company.id;

    let input = |paid| books.purchase_input(books.product, dec!(5), dec!(155.75), paid);

    books.bk.update_purchase(id, purchase.id, input(false)).unwrap();
    let back = books.bk.update_purchase(id, purchase.id, input(true)).unwrap();

    assert!(back.paid);
    assert_eq!(books.balance(books.cash), dec!(-778.75));
    assert_eq!(books.balance(books.payable), Decimal::ZERO);
    assert_eq!(books.entry_count(), 1);
}

#[test]
fn test_update_with_same_values_is_idempotent() {
    let books = Books::new(CostingMethod::Fifo);
    let purchase = books.buy(dec!(5), dec!(155.75));
    let before_entry = books.bk.entry(books.company.id, purchase.entry_id).unwrap();

    let input = books.purchase_input(books.product, dec!(5), dec!(155.75), true);
    let updated = books
        .bk
        .update_purchase(books.company.id, purchase.id, input)
        .unwrap();

    assert_eq!(updated, purchase);
    assert_eq!(books.balance(books.inventory), dec!(778.75));
    assert_eq!(books.balance(books.cash), dec!(-778.75));
    assert_eq!(books.on_hand(books.product), dec!(5));

    let after_entry = books.bk.entry(books.company.id, purchase.entry_id).unwrap();
    assert_eq!(after_entry.transactions, before_entry.transactions);
}

#[test]
fn test_update_changes_lot_in_place() {
    let books = Books::new(CostingMethod::Fifo);
    let purchase = books.buy(dec!(5), dec!(10));

    let input = books.purchase_input(books.product, dec!(8), dec!(12.5), true);
    books
        .bk
        .update_purchase(books.company.id, purchase.id, input)
        .unwrap();

    let lot = books.snapshot().stock_lot(purchase.lot_id).unwrap();
    assert_eq!(lot.quantity, dec!(8));
    assert_eq!(lot.unit_cost, dec!(12.5));
    assert_eq!(books.balance(books.inventory), dec!(100));
    assert_eq!(books.balance(books.cash), dec!(-100));
    assert_eq!(books.on_hand(books.product), dec!(8));
}

#[test]
fn test_update_below_consumed_quantity_rejected() {
    let books = Books::new(CostingMethod::Fifo);
    let purchase = books.buy(dec!(10), dec!(4));
    books.sell(dec!(6), dec!(9)).unwrap();

    let input = books.purchase_input(books.product, dec!(5), dec!(4), true);
    let err = books
        .bk
        .update_purchase(books.company.id, purchase.id, input)
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(ref m) if m.contains("consumed")));

    assert_eq!(books.snapshot().stock_lot(purchase.lot_id).unwrap().quantity, dec!(10));
    assert_eq!(books.on_hand(books.product), dec!(4));
    assert_eq!(books.balance(books.inventory), dec!(16));
}

#[test]
fn test_product_change_moves_unconsumed_lot() {
    let books = Books::new(CostingMethod::Fifo);
    let gadget = books.add_product("Gadget");
    let purchase = books.buy(dec!(4), dec!(3));

    let input = books.purchase_input(gadget, dec!(4), dec!(3), true);
    books
        .bk
        .update_purchase(books.company.id, purchase.id, input)
        .unwrap();

    assert_eq!(books.on_hand(books.product), Decimal::ZERO);
    assert_eq!(books.on_hand(gadget), dec!(4));
}

#[test]
fn test_product_change_of_consumed_lot_rejected() {
    let books = Books::new(CostingMethod::Fifo);
    let gadget = books.add_product("Gadget");
    let purchase = books.buy(dec!(4), dec!(3));
    books.sell(dec!(1), dec!(5)).unwrap();

    let input = books.purchase_input(gadget, dec!(4), dec!(3), true);
    let err = books
        .bk
        .update_purchase(books.company.id, purchase.id, input)
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(books.on_hand(books.product), dec!(3));
}

#[test]
fn test_reprice_of_sold_lot_rejected() {
    let books = Books::new(CostingMethod::Fifo);
    let purchase = books.buy(dec!(10), dec!(4));
    books.sell(dec!(5), dec!(9)).unwrap();

    let input = books.purchase_input(books.product, dec!(10), dec!(5), true);
    let err = books
        .bk
        .update_purchase(books.company.id, purchase.id, input)
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref m) if m.contains("in use")));

    let value = books
        .bk
        .inventory_value(books.company.id, books.product)
        .unwrap();
    assert_eq!(value, dec!(20));
    assert_eq!(books.balance(books.inventory), value);
    assert_eq!(books.balance(books.cash), dec!(5));
}

#[test]
fn test_quantity_change_of_sold_lot_at_same_price() {
    let books = Books::new(CostingMethod::Fifo);
    let purchase = books.buy(dec!(10), dec!(4));
    books.sell(dec!(5), dec!(9)).unwrap();

    let input = books.purchase_input(books.product, dec!(12), dec!(4), true);
    books
        .bk
        .update_purchase(books.company.id, purchase.id, input)
        .unwrap();

    let value = books
        .bk
        .inventory_value(books.company.id, books.product)
        .unwrap();
    assert_eq!(value, dec!(28));
    assert_eq!(books.balance(books.inventory), value);
    books.assert_all_entries_balanced();
}

#[test]
fn test_update_unknown_purchase() {
    let books = Books::new(CostingMethod::Fifo);
    let input = books.purchase_input(books.product, dec!(1), dec!(1), true);
    let err = books
        .bk
        .update_purchase(books.company.id, PurchaseId::new(), input)
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn test_delete_cascades_lot_and_entry() {
    let books = Books::new(CostingMethod::Fifo);
    books.buy(dec!(3), dec!(7));
    let purchase = books.buy(dec!(5), dec!(155.75));
    assert_eq!(books.on_hand(books.product), dec!(8));

    books.bk.delete_purchase(books.company.id, purchase.id).unwrap();

    assert_eq!(books.on_hand(books.product), dec!(3));
    assert_eq!(books.balance(books.inventory), dec!(21));
    assert_eq!(books.balance(books.cash), dec!(-21));
    assert!(matches!(
        books.bk.purchase(books.company.id, purchase.id),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        books.bk.entry(books.company.id, purchase.entry_id),
        Err(AppError::NotFound(_))
    ));

    let snapshot = books.snapshot();
    assert!(snapshot.stock_lot(purchase.lot_id).unwrap_err().is_not_found());
    assert!(snapshot.account_transactions(books.inventory).unwrap().len() == 1);
}

#[test]
fn test_delete_consumed_purchase_rejected() {
    let books = Books::new(CostingMethod::Fifo);
    let purchase = books.buy(dec!(5), dec!(2));
    books.sell(dec!(1), dec!(3)).unwrap();

    let err = books.bk.delete_purchase(books.company.id, purchase.id).unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref m) if m.contains("in use")));
    assert_eq!(books.on_hand(books.product), dec!(4));
    assert!(books.bk.purchase(books.company.id, purchase.id).is_ok());
}

// ============================================================================
// Corrections
// ============================================================================

#[test]
fn test_correction_writes_off_from_own_lot() {
    let books = Books::new(CostingMethod::Fifo);
    let purchase = books.buy(dec!(10), dec!(4));

    let corrected = books
        .bk
        .record_correction(books.company.id, purchase.id, dec!(2), books.loss)
        .unwrap();

    assert_eq!(corrected.corrected_quantity(), dec!(2));
    assert_eq!(books.on_hand(books.product), dec!(8));
    assert_eq!(books.balance(books.inventory), dec!(32));
    assert_eq!(books.balance(books.loss), dec!(8));

    let entry = books
        .bk
        .entry(books.company.id, corrected.corrections[0].entry_id)
        .unwrap();
    assert_eq!(
        entry.source,
        Some(EntrySource::PurchaseCorrection { purchase_id: purchase.id })
    );
    books.assert_all_entries_balanced();

    let err = books.sell(dec!(9), dec!(5)).unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[test]
fn test_correction_beyond_lot_rejected() {
    let books = Books::new(CostingMethod::Fifo);
    let purchase = books.buy(dec!(3), dec!(4));

    let err = books
        .bk
        .record_correction(books.company.id, purchase.id, dec!(4), books.loss)
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
    assert_eq!(books.balance(books.loss), Decimal::ZERO);
    assert!(books.bk.purchase(books.company.id, purchase.id).unwrap().corrections.is_empty());
}

#[test]
fn test_price_change_revalues_corrections() {
    let books = Books::new(CostingMethod::Fifo);
    let purchase = books.buy(dec!(10), dec!(4));
    books
        .bk
        .record_correction(books.company.id, purchase.id, dec!(2), books.loss)
        .unwrap();

    let input = books.purchase_input(books.product, dec!(10), dec!(5), true);
    books
        .bk
        .update_purchase(books.company.id, purchase.id, input)
        .unwrap();

    assert_eq!(books.balance(books.loss), dec!(10));
    assert_eq!(books.balance(books.inventory), dec!(40));
    assert_eq!(books.balance(books.cash), dec!(-50));
    books.assert_all_entries_balanced();
}

#[test]
fn test_delete_unwinds_corrections() {
    let books = Books::new(CostingMethod::Fifo);
    let purchase = books.buy(dec!(10), dec!(4));
    books
        .bk
        .record_correction(books.company.id, purchase.id, dec!(2), books.loss)
        .unwrap();

    books.bk.delete_purchase(books.company.id, purchase.id).unwrap();

    assert_eq!(books.balance(books.loss), Decimal::ZERO);
    assert_eq!(books.balance(books.inventory), Decimal::ZERO);
    assert_eq!(books.on_hand(books.product), Decimal::ZERO);
    assert_eq!(books.entry_count(), 0);
}

#[test]
fn test_product_purchases_in_lot_order() {
    let books = Books::new(CostingMethod::Fifo);
    let first = books.buy(dec!(1), dec!(4));
    let second = books.buy(dec!(2), dec!(5));
    let other = books.add_product("Gadget");
    let input = books.purchase_input(other, dec!(3), dec!(6), true);
    books.bk.create_purchase(books.company.id, input).unwrap();

    let ids: Vec<_> = books
        .bk
        .product_purchases(books.company.id, books.product)
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn test_products_lists_company_catalog() {
    let books = Books::new(CostingMethod::Fifo);
    let gadget = books.add_product("Gadget");
    let other = Books::with_bookkeeper(books.bk.clone(), CostingMethod::Fifo);

    let mut ids: Vec<_> = books
        .bk
        .products(books.company.id)
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    ids.sort();
    let mut expected = vec![books.product, gadget];
    expected.sort();
    assert_eq!(ids, expected);
    assert!(!ids.contains(&other.product));
}
