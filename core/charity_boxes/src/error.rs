//! Error taxonomy shared by the entities, the converter and the operations.

use thiserror::Error;

use crate::types::{BoxId, EventId};

/// Coarse classification of an [`Error`], used by callers to map failures
/// onto their own surface (e.g. HTTP status codes).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// A referenced box or event does not exist.
    NotFound,
    /// Negative amount, unrecognised currency, missing reference.
    InvalidArgument,
    /// The entities are not in a state that permits the operation.
    InvalidState,
    /// The backing store failed.
    Storage,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    // --- NotFound ---
    #[error("collection box {0} does not exist")]
    BoxNotFound(BoxId),

    #[error("fundraising event {0} does not exist")]
    EventNotFound(EventId),

    // --- InvalidArgument ---
    #[error("invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("exchange rate not available for: {from} to {to}")]
    UnsupportedPair { from: String, to: String },

    #[error("fundraising event cannot be empty")]
    MissingEvent,

    #[error("collection box cannot be empty")]
    MissingBox,

    // --- InvalidState ---
    #[error("collection box is already assigned to event {0}")]
    AlreadyAssigned(EventId),

    #[error("collection box {0} is not empty")]
    BoxNotEmpty(BoxId),

    #[error("collection box {0} is not assigned to any event")]
    NotAssigned(BoxId),

    #[error("collection box {0} is already assigned to another event")]
    BoxAlreadyLinked(BoxId),

    #[error("event {event} already has collection box {linked} assigned")]
    EventAlreadyHasBox { event: EventId, linked: BoxId },

    #[error("no collection box is assigned to event {0}")]
    NoBoxAssigned(EventId),

    #[error("collection box {given} is not the box linked to event {event}")]
    LinkMismatch { event: EventId, given: BoxId },

    #[error("collection box {0} is still assigned to an event")]
    BoxStillAssigned(BoxId),

    #[error("fundraising event {0} still has a collection box assigned")]
    EventStillHasBox(EventId),

    // --- Storage ---
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BoxNotFound(_) | Self::EventNotFound(_) => ErrorKind::NotFound,
            Self::InvalidAmount(_)
            | Self::InvalidCurrency(_)
            | Self::UnsupportedPair { .. }
            | Self::MissingEvent
            | Self::MissingBox => ErrorKind::InvalidArgument,
            Self::AlreadyAssigned(_)
            | Self::BoxNotEmpty(_)
            | Self::NotAssigned(_)
            | Self::BoxAlreadyLinked(_)
            | Self::EventAlreadyHasBox { .. }
            | Self::NoBoxAssigned(_)
            | Self::LinkMismatch { .. }
            | Self::BoxStillAssigned(_)
            | Self::EventStillHasBox(_) => ErrorKind::InvalidState,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
