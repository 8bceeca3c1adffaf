//! # Fundraising event
//!
//! A campaign with a single target currency and an account balance in that
//! currency. An event is linked to at most one box; the link is held as ids
//! on both sides and is only ever changed through [`FundraisingEvent::assign_box`]
//! and [`FundraisingEvent::unassign_box`], which update both sides together.
//!
//! ```text
//! UNLINKED ──assign (box empty)──► LINKED ──unassign (box forced empty)──► UNLINKED
//! ```
//!
//! `LINKED ──► LINKED` is always rejected.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::collection_box::CollectionBox;
use crate::converter::RateTable;
use crate::error::{Error, Result};
use crate::types::{BoxId, Currency, EventId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundraisingEvent {
    id: EventId,
    name: String,
    currency: Currency,
    account_balance: f64,
    collection_box: Option<BoxId>,
}

/// One row of the financial report: how much each event has collected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancialReportEntry {
    pub name: String,
    pub account_balance: f64,
    pub currency: Currency,
}

impl FundraisingEvent {
    pub fn new(name: impl Into<String>, currency: Currency) -> Self {
        Self {
            id: EventId::new(),
            name: name.into(),
            currency,
            account_balance: 0.0,
            collection_box: None,
        }
    }

    /// Rebuild an event from stored parts.
    pub fn restore(
        id: EventId,
        name: String,
        currency: Currency,
        account_balance: f64,
        collection_box: Option<BoxId>,
    ) -> Self {
        Self {
            id,
            name,
            currency,
            account_balance,
            collection_box,
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn account_balance(&self) -> f64 {
        self.account_balance
    }

    pub fn collection_box(&self) -> Option<BoxId> {
        self.collection_box
    }

    pub fn report_entry(&self) -> FinancialReportEntry {
        FinancialReportEntry {
            name: self.name.clone(),
            account_balance: self.account_balance,
            currency: self.currency,
        }
    }

    /// Link `collection_box` to this event.
    ///
    /// Nothing is modified unless every check on both sides passes.
    pub fn assign_box(&mut self, collection_box: &mut CollectionBox) -> Result<()> {
        if collection_box.id().is_nil() {
            return Err(Error::MissingBox);
        }
        if collection_box.is_assigned() {
            return Err(Error::BoxAlreadyLinked(collection_box.id()));
        }
        if let Some(linked) = self.collection_box {
            return Err(Error::EventAlreadyHasBox {
                event: self.id,
                linked,
            });
        }
        // The box re-checks emptiness; our side is only set once it accepted.
        collection_box.assign_to_event(self.id)?;
        self.collection_box = Some(collection_box.id());
        info!(event_id = %self.id, box_id = %collection_box.id(), "Collection box linked to event");
        Ok(())
    }

    /// Dissolve the link with `collection_box`, which is emptied in the process.
    pub fn unassign_box(&mut self, collection_box: &mut CollectionBox) -> Result<()> {
        self.check_linked(collection_box)?;
        if collection_box.assigned_event() != Some(self.id) {
            return Err(Error::LinkMismatch {
                event: self.id,
                given: collection_box.id(),
            });
        }
        collection_box.empty_fully();
        collection_box.unassign_from_event()?;
        self.collection_box = None;
        info!(event_id = %self.id, box_id = %collection_box.id(), "Collection box unlinked from event");
        Ok(())
    }

    /// Sweep the linked box into the account using the standard rates.
    pub fn transfer_from_box(&mut self, collection_box: &mut CollectionBox) -> Result<f64> {
        self.transfer_from_box_with(collection_box, RateTable::standard())
    }

    /// Sweep the linked box into the account, converting every currency into
    /// the event's currency with `rates`. Returns the amount credited.
    ///
    /// Each converted amount is added to the balance in currency order, on a
    /// working copy that is only stored once every conversion succeeded, so a
    /// missing rate leaves both the account and the box unchanged.
    pub fn transfer_from_box_with(
        &mut self,
        collection_box: &mut CollectionBox,
        rates: &RateTable,
    ) -> Result<f64> {
        self.check_linked(collection_box)?;
        if collection_box.assigned_event() != Some(self.id) {
            return Err(Error::LinkMismatch {
                event: self.id,
                given: collection_box.id(),
            });
        }
        if collection_box.is_empty() {
            debug!(event_id = %self.id, "Collection box empty, nothing to transfer");
            return Ok(0.0);
        }

        let before = self.account_balance;
        let mut balance = before;
        for (currency, amount) in collection_box.balances() {
            balance += rates.convert(currency, self.currency, amount)?;
        }
        let credited = balance - before;

        self.account_balance = balance;
        collection_box.empty_fully();
        info!(
            event_id = %self.id,
            box_id = %collection_box.id(),
            credited,
            currency = %self.currency,
            balance = self.account_balance,
            "Transferred collection box into event account"
        );
        Ok(credited)
    }

    fn check_linked(&self, collection_box: &CollectionBox) -> Result<()> {
        match self.collection_box {
            None => Err(Error::NoBoxAssigned(self.id)),
            Some(linked) if linked != collection_box.id() => Err(Error::LinkMismatch {
                event: self.id,
                given: collection_box.id(),
            }),
            Some(_) => Ok(()),
        }
    }
}

impl Default for FundraisingEvent {
    /// The no-argument creation path: unnamed, denominated in the default
    /// currency.
    fn default() -> Self {
        Self::new(String::new(), Currency::default())
    }
}
