//! # Collection box
//!
//! A physical container holding cash in several currencies.
//!
//! Every [`Currency`] always has an entry in `balances`, so reads never miss.
//! A box may point at one [`FundraisingEvent`](crate::FundraisingEvent) by id,
//! and can only start pointing at one while every balance is exactly zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{BoxId, Currency, EventId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionBox {
    id: BoxId,
    balances: BTreeMap<Currency, f64>,
    assigned_event: Option<EventId>,
}

impl CollectionBox {
    /// A fresh, empty, unassigned box.
    pub fn new() -> Self {
        Self::with_id(BoxId::new())
    }

    pub fn with_id(id: BoxId) -> Self {
        Self {
            id,
            balances: Currency::ALL.into_iter().map(|c| (c, 0.0)).collect(),
            assigned_event: None,
        }
    }

    /// Rebuild a box from stored parts. Currencies missing from `balances`
    /// read as zero.
    pub fn restore(
        id: BoxId,
        balances: impl IntoIterator<Item = (Currency, f64)>,
        assigned_event: Option<EventId>,
    ) -> Self {
        let mut collection_box = Self::with_id(id);
        collection_box.balances.extend(balances);
        collection_box.assigned_event = assigned_event;
        collection_box
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    pub fn assigned_event(&self) -> Option<EventId> {
        self.assigned_event
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_event.is_some()
    }

    /// Balances in currency declaration order.
    pub fn balances(&self) -> impl Iterator<Item = (Currency, f64)> + '_ {
        self.balances.iter().map(|(c, v)| (*c, *v))
    }

    /// Put money into the box.
    ///
    /// The stored balance for `currency` is replaced by `amount`; repeated
    /// deposits in one currency keep only the last amount.
    pub fn deposit(&mut self, currency: Currency, amount: f64) -> Result<()> {
        check_amount(amount)?;
        self.balances.insert(currency, amount);
        debug!(box_id = %self.id, %currency, amount, "Deposited into collection box");
        Ok(())
    }

    /// Like [`deposit`](Self::deposit), for a currency code coming from outside.
    /// A bad amount is reported before a bad currency.
    pub fn deposit_code(&mut self, currency: Option<&str>, amount: f64) -> Result<()> {
        check_amount(amount)?;
        let currency = Currency::parse_code(currency)?;
        self.deposit(currency, amount)
    }

    pub fn balance_of(&self, currency: Currency) -> f64 {
        self.balances.get(&currency).copied().unwrap_or(0.0)
    }

    pub fn balance_of_code(&self, currency: Option<&str>) -> Result<f64> {
        Currency::parse_code(currency).map(|c| self.balance_of(c))
    }

    pub fn empty_fully(&mut self) {
        self.balances.values_mut().for_each(|v| *v = 0.0);
    }

    pub fn is_empty(&self) -> bool {
        Currency::ALL.iter().all(|c| self.balance_of(*c) == 0.0)
    }

    /// Record that this box now belongs to `event`.
    ///
    /// Only this side of the link is checked here; whether the event already
    /// holds a box is the event's concern.
    pub fn assign_to_event(&mut self, event: EventId) -> Result<()> {
        if event.is_nil() {
            return Err(Error::MissingEvent);
        }
        if let Some(current) = self.assigned_event {
            return Err(Error::AlreadyAssigned(current));
        }
        if !self.is_empty() {
            return Err(Error::BoxNotEmpty(self.id));
        }
        self.assigned_event = Some(event);
        debug!(box_id = %self.id, event_id = %event, "Collection box assigned");
        Ok(())
    }

    /// Drop the event back-reference. Emptying the box is the caller's job
    /// and must happen in the same logical step.
    pub fn unassign_from_event(&mut self) -> Result<EventId> {
        let event = self.assigned_event.take().ok_or(Error::NotAssigned(self.id))?;
        debug!(box_id = %self.id, event_id = %event, "Collection box unassigned");
        Ok(event)
    }
}

fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount(amount));
    }
    Ok(())
}

impl Default for CollectionBox {
    fn default() -> Self {
        Self::new()
    }
}
