//! # Operations
//!
//! The externally invoked actions, written against any [`Repository`].
//!
//! | Area    | Operation(s)                                                      |
//! |---------|-------------------------------------------------------------------|
//! | Boxes   | [`register_box`], [`list_boxes`], [`get_box`], [`unregister_box`], [`deposit`], [`empty_box`] |
//! | Events  | [`create_default_event`], [`create_event`], [`list_events`], [`get_event`], [`delete_event`], [`financial_report`] |
//! | Linking | [`assign_box`], [`unassign_box`], [`box_of_event`]                |
//! | Money   | [`transfer`]                                                      |
//!
//! Each operation takes `&mut R`, so the caller must hand it exclusive access
//! to the store for the whole call (a transaction, a mutex guard, ...).
//! Entities are loaded as owned copies and written back only after every
//! step has succeeded: a failed operation saves nothing.

use tracing::{info, warn};

use crate::collection_box::CollectionBox;
use crate::error::{Error, Result};
use crate::fundraising_event::{FinancialReportEntry, FundraisingEvent};
use crate::repository::Repository;
use crate::types::{BoxId, Currency, EventId};

async fn load_box<R: Repository + ?Sized>(repo: &mut R, id: BoxId) -> Result<CollectionBox> {
    repo.find_box(id).await?.ok_or(Error::BoxNotFound(id))
}

async fn load_event<R: Repository + ?Sized>(repo: &mut R, id: EventId) -> Result<FundraisingEvent> {
    repo.find_event(id).await?.ok_or(Error::EventNotFound(id))
}

/// Load the box linked to `event`, failing with `NoBoxAssigned` when there
/// is none.
async fn load_linked_box<R: Repository + ?Sized>(
    repo: &mut R,
    event: &FundraisingEvent,
) -> Result<CollectionBox> {
    let box_id = event
        .collection_box()
        .ok_or(Error::NoBoxAssigned(event.id()))?;
    load_box(repo, box_id).await
}

// ─────────────────────────────────────────────────────────
// Boxes
// ─────────────────────────────────────────────────────────

pub async fn register_box<R: Repository + ?Sized>(repo: &mut R) -> Result<CollectionBox> {
    let collection_box = CollectionBox::new();
    repo.save_box(&collection_box).await?;
    info!(box_id = %collection_box.id(), "Collection box registered");
    Ok(collection_box)
}

pub async fn list_boxes<R: Repository + ?Sized>(repo: &mut R) -> Result<Vec<CollectionBox>> {
    repo.list_boxes().await
}

pub async fn get_box<R: Repository + ?Sized>(repo: &mut R, id: BoxId) -> Result<CollectionBox> {
    load_box(repo, id).await
}

/// Delete a box. A box still linked to an event cannot be deleted.
pub async fn unregister_box<R: Repository + ?Sized>(repo: &mut R, id: BoxId) -> Result<()> {
    if !repo.box_exists(id).await? {
        return Err(Error::BoxNotFound(id));
    }
    let collection_box = load_box(repo, id).await?;
    if collection_box.is_assigned() {
        warn!(box_id = %id, "Refusing to delete an assigned collection box");
        return Err(Error::BoxStillAssigned(id));
    }
    repo.delete_box(id).await?;
    info!(box_id = %id, "Collection box unregistered");
    Ok(())
}

pub async fn deposit<R: Repository + ?Sized>(
    repo: &mut R,
    id: BoxId,
    currency: Option<&str>,
    amount: f64,
) -> Result<CollectionBox> {
    let mut collection_box = load_box(repo, id).await?;
    collection_box.deposit_code(currency, amount)?;
    repo.save_box(&collection_box).await?;
    Ok(collection_box)
}

pub async fn empty_box<R: Repository + ?Sized>(repo: &mut R, id: BoxId) -> Result<CollectionBox> {
    let mut collection_box = load_box(repo, id).await?;
    collection_box.empty_fully();
    repo.save_box(&collection_box).await?;
    info!(box_id = %id, "Collection box emptied");
    Ok(collection_box)
}

// ─────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────

/// Create an unnamed event in the default currency.
pub async fn create_default_event<R: Repository + ?Sized>(repo: &mut R) -> Result<FundraisingEvent> {
    let event = FundraisingEvent::default();
    repo.save_event(&event).await?;
    info!(event_id = %event.id(), "Fundraising event created");
    Ok(event)
}

/// Create a named event. `currency` must be one of the supported codes.
pub async fn create_event<R: Repository + ?Sized>(
    repo: &mut R,
    name: &str,
    currency: &str,
) -> Result<FundraisingEvent> {
    let currency: Currency = currency.parse()?;
    let event = FundraisingEvent::new(name, currency);
    repo.save_event(&event).await?;
    info!(event_id = %event.id(), event_name = name, %currency, "Fundraising event created");
    Ok(event)
}

pub async fn list_events<R: Repository + ?Sized>(repo: &mut R) -> Result<Vec<FundraisingEvent>> {
    repo.list_events().await
}

pub async fn get_event<R: Repository + ?Sized>(repo: &mut R, id: EventId) -> Result<FundraisingEvent> {
    load_event(repo, id).await
}

pub async fn financial_report<R: Repository + ?Sized>(
    repo: &mut R,
) -> Result<Vec<FinancialReportEntry>> {
    Ok(repo
        .list_events()
        .await?
        .iter()
        .map(FundraisingEvent::report_entry)
        .collect())
}

/// Delete an event. An event that still holds a box cannot be deleted.
pub async fn delete_event<R: Repository + ?Sized>(repo: &mut R, id: EventId) -> Result<()> {
    if !repo.event_exists(id).await? {
        return Err(Error::EventNotFound(id));
    }
    let event = load_event(repo, id).await?;
    if event.collection_box().is_some() {
        warn!(event_id = %id, "Refusing to delete an event with a collection box");
        return Err(Error::EventStillHasBox(id));
    }
    repo.delete_event(id).await?;
    info!(event_id = %id, "Fundraising event deleted");
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Linking
// ─────────────────────────────────────────────────────────

pub async fn assign_box<R: Repository + ?Sized>(
    repo: &mut R,
    event_id: EventId,
    box_id: BoxId,
) -> Result<FundraisingEvent> {
    if box_id.is_nil() {
        return Err(Error::MissingBox);
    }
    let mut event = load_event(repo, event_id).await?;
    let mut collection_box = load_box(repo, box_id).await?;
    event.assign_box(&mut collection_box)?;
    repo.save_box(&collection_box).await?;
    repo.save_event(&event).await?;
    Ok(event)
}

pub async fn unassign_box<R: Repository + ?Sized>(
    repo: &mut R,
    event_id: EventId,
) -> Result<FundraisingEvent> {
    let mut event = load_event(repo, event_id).await?;
    let mut collection_box = load_linked_box(repo, &event).await?;
    event.unassign_box(&mut collection_box)?;
    repo.save_box(&collection_box).await?;
    repo.save_event(&event).await?;
    Ok(event)
}

/// The box currently linked to the event, if any.
pub async fn box_of_event<R: Repository + ?Sized>(
    repo: &mut R,
    event_id: EventId,
) -> Result<Option<CollectionBox>> {
    let event = load_event(repo, event_id).await?;
    match event.collection_box() {
        Some(box_id) => repo.find_box(box_id).await,
        None => Ok(None),
    }
}

// ─────────────────────────────────────────────────────────
// Money
// ─────────────────────────────────────────────────────────

/// Move everything in the event's box into the event account.
pub async fn transfer<R: Repository + ?Sized>(
    repo: &mut R,
    event_id: EventId,
) -> Result<FundraisingEvent> {
    let mut event = load_event(repo, event_id).await?;
    let mut collection_box = load_linked_box(repo, &event).await?;
    let credited = event.transfer_from_box(&mut collection_box)?;
    repo.save_box(&collection_box).await?;
    repo.save_event(&event).await?;
    info!(event_id = %event_id, credited, "Transfer completed");
    Ok(event)
}
