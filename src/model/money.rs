//! Monetary amounts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A non-negative amount of money, held in centavos.
///
/// Persisted as a decimal number of pesos to match the payment record
/// contract (`amount: number`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount {
    centavos: u64,
}

/// Why an amount could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount must not be negative")]
    Negative,

    #[error("amount is not a finite number")]
    NotFinite,

    #[error("invalid amount '{0}': expected e.g. 1500 or 1500.50")]
    Malformed(String),

    #[error("amount is too large")]
    OutOfRange,
}

impl Amount {
    pub const fn from_centavos(centavos: u64) -> Self {
        Self { centavos }
    }

    /// Whole pesos, saturating at the largest representable amount.
    pub const fn from_pesos(pesos: u64) -> Self {
        Self {
            centavos: pesos.saturating_mul(100),
        }
    }

    pub const fn centavos(self) -> u64 {
        self.centavos
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.centavos / 100, self.centavos % 100)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('-') {
            return Err(AmountError::Negative);
        }
        let malformed = || AmountError::Malformed(s.to_string());
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() || frac.len() > 2 || !all_digits(whole) || !all_digits(frac) {
            return Err(malformed());
        }
        let pesos: u64 = whole.parse().map_err(|_| malformed())?;
        let centavos: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| malformed())? * 10,
            _ => frac.parse().map_err(|_| malformed())?,
        };
        pesos
            .checked_mul(100)
            .and_then(|c| c.checked_add(centavos))
            .map(Self::from_centavos)
            .ok_or(AmountError::OutOfRange)
    }
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

impl TryFrom<f64> for Amount {
    type Error = AmountError;

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn try_from(pesos: f64) -> Result<Self, Self::Error> {
        if !pesos.is_finite() {
            return Err(AmountError::NotFinite);
        }
        if pesos < 0.0 {
            return Err(AmountError::Negative);
        }
        let centavos = (pesos * 100.0).round();
        // u64::MAX rounds up to 2^64 as an f64, so equality is already too big.
        if centavos >= u64::MAX as f64 {
            return Err(AmountError::OutOfRange);
        }
        Ok(Self::from_centavos(centavos as u64))
    }
}

impl From<Amount> for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from(amount: Amount) -> Self {
        amount.centavos as f64 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_pesos() {
        assert_eq!("1500".parse::<Amount>().unwrap(), Amount::from_pesos(1500));
        assert_eq!(
            "1500.5".parse::<Amount>().unwrap(),
            Amount::from_centavos(150_050)
        );
        assert_eq!(
            "0.07".parse::<Amount>().unwrap(),
            Amount::from_centavos(7)
        );
    }

    #[test]
    fn rejects_negative_and_garbage() {
        assert_eq!("-5".parse::<Amount>(), Err(AmountError::Negative));
        assert!(matches!(
            "12.345".parse::<Amount>(),
            Err(AmountError::Malformed(_))
        ));
        assert!(matches!(
            "abc".parse::<Amount>(),
            Err(AmountError::Malformed(_))
        ));
        assert!(matches!(".5".parse::<Amount>(), Err(AmountError::Malformed(_))));
    }

    #[test]
    fn rejects_signs_inside_and_ahead_of_digits() {
        assert!(matches!("1.+5".parse::<Amount>(), Err(AmountError::Malformed(_))));
        assert!(matches!("+5".parse::<Amount>(), Err(AmountError::Malformed(_))));
        assert!(matches!("5.-1".parse::<Amount>(), Err(AmountError::Malformed(_))));
        assert!(matches!("1 5".parse::<Amount>(), Err(AmountError::Malformed(_))));
    }

    #[test]
    fn rejects_amounts_beyond_u64_centavos() {
        assert_eq!(
            "184467440737095517".parse::<Amount>(),
            Err(AmountError::OutOfRange)
        );
        assert!(serde_json::from_str::<Amount>("1e30").is_err());
        assert_eq!(Amount::try_from(1e30), Err(AmountError::OutOfRange));
        assert_eq!(
            Amount::try_from(1e15).unwrap(),
            Amount::from_pesos(1_000_000_000_000_000)
        );
    }

    #[test]
    fn from_pesos_saturates() {
        assert_eq!(Amount::from_pesos(u64::MAX).centavos(), u64::MAX);
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Amount::from_centavos(250_005).to_string(), "2500.05");
    }

    #[test]
    fn serializes_as_pesos_number() {
        let json = serde_json::to_string(&Amount::from_centavos(150_050)).unwrap();
        assert_eq!(json, "1500.5");

        let back: Amount = serde_json::from_str("2500").unwrap();
        assert_eq!(back, Amount::from_pesos(2500));

        assert!(serde_json::from_str::<Amount>("-1").is_err());
    }
}
