#![allow(dead_code)]

use crate::types::Currency;
use crate::{CollectionBox, FundraisingEvent};

/// INV-1: every currency has a balance and none is negative.
pub fn assert_balances_complete(collection_box: &CollectionBox) {
    assert_eq!(
        collection_box.balances().count(),
        Currency::ALL.len(),
        "INV-1 violated: box {} is missing a currency",
        collection_box.id()
    );
    for (currency, amount) in collection_box.balances() {
        assert!(
            amount >= 0.0,
            "INV-1 violated: box {} holds {} {}",
            collection_box.id(),
            amount,
            currency
        );
    }
}

/// INV-2: an event's account balance is never negative.
pub fn assert_account_non_negative(event: &FundraisingEvent) {
    assert!(
        event.account_balance() >= 0.0,
        "INV-2 violated: event {} has balance {}",
        event.id(),
        event.account_balance()
    );
}

/// INV-3: a linked pair points at each other.
pub fn assert_linked(collection_box: &CollectionBox, event: &FundraisingEvent) {
    assert_eq!(
        collection_box.assigned_event(),
        Some(event.id()),
        "INV-3 violated: box {} does not point at event {}",
        collection_box.id(),
        event.id()
    );
    assert_eq!(
        event.collection_box(),
        Some(collection_box.id()),
        "INV-3 violated: event {} does not point at box {}",
        event.id(),
        collection_box.id()
    );
}

/// INV-4: neither side of an unlinked pair references anything.
pub fn assert_unlinked(collection_box: &CollectionBox, event: &FundraisingEvent) {
    assert_eq!(
        collection_box.assigned_event(),
        None,
        "INV-4 violated: box {} still references an event",
        collection_box.id()
    );
    assert_eq!(
        event.collection_box(),
        None,
        "INV-4 violated: event {} still references a box",
        event.id()
    );
}

/// Run all stateless entity invariants.
pub fn assert_all_invariants(collection_box: &CollectionBox, event: &FundraisingEvent) {
    assert_balances_complete(collection_box);
    assert_account_non_negative(event);
}
