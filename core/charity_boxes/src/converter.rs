//! Fixed exchange-rate table and pairwise conversion.
//!
//! Rates are directed: `EUR -> PLN` and `PLN -> EUR` are independent entries
//! and neither is derived from the other.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::types::Currency;

static STANDARD_RATES: LazyLock<RateTable> = LazyLock::new(|| {
    RateTable::from_pairs([
        ((Currency::Pln, Currency::Eur), 0.22),
        ((Currency::Pln, Currency::Gbp), 0.20),
        ((Currency::Eur, Currency::Pln), 4.50),
        ((Currency::Eur, Currency::Gbp), 0.84),
        ((Currency::Gbp, Currency::Pln), 5.04),
        ((Currency::Gbp, Currency::Eur), 1.19),
    ])
});

/// Immutable table of directed exchange rates.
#[derive(Clone, Debug, Default)]
pub struct RateTable {
    rates: HashMap<(Currency, Currency), f64>,
}

impl RateTable {
    /// The process-wide table every transfer uses unless told otherwise.
    pub fn standard() -> &'static RateTable {
        &STANDARD_RATES
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = ((Currency, Currency), f64)>,
    {
        Self {
            rates: pairs.into_iter().collect(),
        }
    }

    pub fn rate(&self, from: Currency, to: Currency) -> Option<f64> {
        self.rates.get(&(from, to)).copied()
    }

    /// Convert `amount` from one currency into another.
    ///
    /// Same-currency conversion returns `amount` untouched without consulting
    /// the table.
    pub fn convert(&self, from: Currency, to: Currency, amount: f64) -> Result<f64> {
        if from == to {
            return Ok(amount);
        }
        let rate = self.rate(from, to).ok_or_else(|| Error::UnsupportedPair {
            from: from.to_string(),
            to: to.to_string(),
        })?;
        Ok(amount * rate)
    }
}

/// Convert with the standard table.
pub fn convert(from: Currency, to: Currency, amount: f64) -> Result<f64> {
    RateTable::standard().convert(from, to, amount)
}

/// Convert between raw currency codes.
///
/// Identical codes short-circuit to the identity even if the code is not a
/// known currency. Any other unknown code is an unsupported pair.
pub fn convert_codes(from: &str, to: &str, amount: f64) -> Result<f64> {
    if from == to {
        return Ok(amount);
    }
    let unsupported = || Error::UnsupportedPair {
        from: from.to_string(),
        to: to.to_string(),
    };
    let from_currency: Currency = from.parse().map_err(|_| unsupported())?;
    let to_currency: Currency = to.parse().map_err(|_| unsupported())?;
    convert(from_currency, to_currency, amount)
}
