//! # Charity collection boxes
//!
//! Tracks cash collection boxes and fundraising events. A box holds money in
//! several currencies; an event holds one balance in its own currency. A box
//! can be linked to at most one event, and linking requires the box to be
//! empty. Transferring sweeps the linked box into the event account,
//! converting each currency at a fixed rate.
//!
//! | Area       | Item(s)                                             |
//! |------------|-----------------------------------------------------|
//! | Currencies | [`Currency`], [`converter`]                         |
//! | Entities   | [`CollectionBox`], [`FundraisingEvent`]             |
//! | Storage    | [`Repository`], [`MemoryRepository`]               |
//! | Actions    | [`operations`]                                      |
//!
//! ## Architecture
//!
//! The entities hold the state machine and all invariants. They refer to
//! each other only by id. [`operations`] resolves ids through a
//! [`Repository`], runs the entity methods on owned copies and writes them
//! back once everything succeeded. No I/O happens outside the repository.

pub mod collection_box;
pub mod converter;
pub mod error;
pub mod fundraising_event;
pub mod operations;
pub mod repository;
pub mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_operations;

pub use collection_box::CollectionBox;
pub use converter::{convert, convert_codes, RateTable};
pub use error::{Error, ErrorKind, Result};
pub use fundraising_event::{FinancialReportEntry, FundraisingEvent};
pub use repository::{MemoryRepository, Repository};
pub use types::{BoxId, Currency, EventId};
