//! # Types
//!
//! Identifiers and the currency set shared by every module.
//!
//! ## Design decisions
//!
//! ### Ids instead of references
//!
//! A box and an event point at each other. Both sides hold only the other's
//! id ([`BoxId`] / [`EventId`]); the orchestration layer resolves ids through
//! the repository. Neither entity owns the other.
//!
//! A nil id stands in for a missing reference and is rejected wherever a
//! reference is required.
//!
//! ### Closed currency set
//!
//! [`Currency`] is a fixed enum. Its declaration order is the iteration order
//! used when a box is swept into an event:
//!
//! ```text
//! PLN ──► EUR ──► GBP
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Allocate a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The nil id, used as the "no reference" marker.
            pub const fn nil() -> Self {
                Self(Uuid::nil())
            }

            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

entity_id! {
    /// Identity of a [`CollectionBox`](crate::CollectionBox).
    BoxId
}

entity_id! {
    /// Identity of a [`FundraisingEvent`](crate::FundraisingEvent).
    EventId
}

/// Currencies a box can hold and an event can be denominated in.
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum Currency {
    #[default]
    #[serde(rename = "PLN")]
    Pln,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
}

impl Currency {
    /// Every currency, in declaration order.
    pub const ALL: [Currency; 3] = [Currency::Pln, Currency::Eur, Currency::Gbp];

    /// ISO 4217 code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pln => "PLN",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }

    /// Parse an optional currency code. An absent code is as invalid as an
    /// unknown one.
    pub fn parse_code(code: Option<&str>) -> Result<Self> {
        match code {
            Some(code) => code.parse(),
            None => Err(Error::InvalidCurrency("<none>".to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidCurrency(s.to_string()))
    }
}
