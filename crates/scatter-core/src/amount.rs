//! Fixed-point monetary amounts.
//!
//! An [`Amount`] counts base units, 10^-8 of a coin. Values produced by
//! floating-point math (sampled stake and scatter sizes, balances decoded
//! from JSON) are converted through their shortest decimal representation
//! and rounded half-up at the eighth fractional digit. A value that already
//! has eight or fewer decimals therefore converts exactly, which makes the
//! rounding idempotent.

use std::fmt;
use std::str::FromStr;

use crate::constants::{AMOUNT_DECIMALS, COIN};
use crate::error::AmountError;

/// A non-negative amount with exactly eight fractional digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    /// Zero coins.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from a count of base units.
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// The amount in base units.
    pub const fn units(self) -> u64 {
        self.0
    }

    /// Create an amount from a whole number of coins.
    pub fn from_coins(coins: u64) -> Result<Self, AmountError> {
        coins
            .checked_mul(COIN)
            .map(Self)
            .ok_or(AmountError::Overflow)
    }

    /// Round a floating-point coin value half-up to eight decimals.
    ///
    /// The conversion goes through the shortest decimal string that
    /// round-trips to `value`, so `0.1 + 0.2` becomes `0.30000000` rather
    /// than picking up binary noise.
    pub fn from_coins_f64(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NonFinite);
        }
        Self::from_decimal_str(&value.to_string())
    }

    /// Parse a plain decimal string, rounding half-up to eight decimals.
    ///
    /// Accepts an optional sign, digits, and an optional fractional part.
    /// Exponent notation is rejected. Negative values are an error unless
    /// they round to zero.
    pub fn from_decimal_str(s: &str) -> Result<Self, AmountError> {
        let text = s.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(AmountError::Malformed(s.to_string()));
        }

        let whole_coins = if whole.is_empty() {
            0
        } else {
            whole.parse::<u64>().map_err(|_| AmountError::Overflow)?
        };
        let whole_units = whole_coins
            .checked_mul(COIN)
            .ok_or(AmountError::Overflow)?;

        let fraction = fraction.as_bytes();
        let mut fraction_units = 0u64;
        for i in 0..AMOUNT_DECIMALS {
            let digit = fraction.get(i).map_or(0, |b| u64::from(b - b'0'));
            fraction_units = fraction_units * 10 + digit;
        }
        let round_up = fraction.get(AMOUNT_DECIMALS).is_some_and(|b| *b >= b'5');

        let units = whole_units
            .checked_add(fraction_units)
            .and_then(|u| u.checked_add(u64::from(round_up)))
            .ok_or(AmountError::Overflow)?;

        if negative && units != 0 {
            return Err(AmountError::Negative(text.to_string()));
        }
        Ok(Self(units))
    }

    /// The amount as a floating-point coin value, for JSON-RPC parameters.
    pub fn to_coins_f64(self) -> f64 {
        self.0 as f64 / COIN as f64
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:0width$}",
            self.0 / COIN,
            self.0 % COIN,
            width = AMOUNT_DECIMALS
        )
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_has_eight_decimals() {
        assert_eq!(Amount::from_coins(50).unwrap().to_string(), "50.00000000");
        assert_eq!(Amount::from_units(1).to_string(), "0.00000001");
        assert_eq!(Amount::ZERO.to_string(), "0.00000000");
    }

    #[test]
    fn rounds_half_up_at_ninth_digit() {
        let a: Amount = "0.123456785".parse().unwrap();
        assert_eq!(a.units(), 12_345_679);
        let b: Amount = "0.123456784999".parse().unwrap();
        assert_eq!(b.units(), 12_345_678);
        let c: Amount = "0.999999995".parse().unwrap();
        assert_eq!(c, Amount::from_coins(1).unwrap());
    }

    #[test]
    fn float_noise_is_discarded() {
        let a = Amount::from_coins_f64(0.1 + 0.2).unwrap();
        assert_eq!(a.to_string(), "0.30000000");
    }

    #[test]
    fn tiny_floats_round_half_up() {
        assert_eq!(Amount::from_coins_f64(5e-9).unwrap().units(), 1);
        assert_eq!(Amount::from_coins_f64(4.9e-9).unwrap().units(), 0);
    }

    #[test]
    fn accepts_missing_whole_or_fraction() {
        assert_eq!(".5".parse::<Amount>().unwrap().units(), COIN / 2);
        assert_eq!("5.".parse::<Amount>().unwrap().units(), 5 * COIN);
        assert_eq!("+2".parse::<Amount>().unwrap().units(), 2 * COIN);
    }

    #[test]
    fn negative_is_rejected_unless_it_rounds_to_zero() {
        assert!(matches!(
            Amount::from_coins_f64(-3.5),
            Err(AmountError::Negative(_))
        ));
        assert_eq!(Amount::from_coins_f64(-0.0).unwrap(), Amount::ZERO);
        assert_eq!("-0.000000001".parse::<Amount>().unwrap(), Amount::ZERO);
    }

    #[test]
    fn non_finite_is_rejected() {
        assert_eq!(Amount::from_coins_f64(f64::NAN), Err(AmountError::NonFinite));
        assert_eq!(
            Amount::from_coins_f64(f64::INFINITY),
            Err(AmountError::NonFinite)
        );
    }

    #[test]
    fn malformed_strings_are_rejected() {
        for s in ["", ".", "1.2.3", "abc", "1e5", "--1"] {
            assert!(
                matches!(s.parse::<Amount>(), Err(AmountError::Malformed(_))),
                "{s:?} should be malformed"
            );
        }
    }

    #[test]
    fn overflow_is_detected() {
        assert_eq!(
            "200000000000".parse::<Amount>(),
            Err(AmountError::Overflow)
        );
        assert_eq!(Amount::from_coins(u64::MAX), Err(AmountError::Overflow));
        assert!(Amount::from_units(u64::MAX)
            .checked_add(Amount::from_units(1))
            .is_none());
    }

    #[test]
    fn arithmetic_helpers() {
        let a = Amount::from_coins(3).unwrap();
        let b = Amount::from_coins(1).unwrap();
        assert_eq!(a.checked_sub(b), Some(Amount::from_coins(2).unwrap()));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(
            Amount::from_units(u64::MAX).saturating_add(b),
            Amount::from_units(u64::MAX)
        );
        assert!(Amount::ZERO.is_zero());
    }

    proptest! {
        #[test]
        fn display_parse_is_identity(units in 0u64..u64::MAX / 2) {
            let a = Amount::from_units(units);
            let text = a.to_string();
            let (_, fraction) = text.split_once('.').unwrap();
            prop_assert_eq!(fraction.len(), AMOUNT_DECIMALS);
            prop_assert_eq!(text.parse::<Amount>().unwrap(), a);
        }

        #[test]
        fn float_rounding_is_idempotent(value in 0.0f64..1_000_000.0) {
            let once = Amount::from_coins_f64(value).unwrap();
            let twice = Amount::from_coins_f64(once.to_coins_f64()).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn float_rounding_stays_within_half_unit(value in 0.0f64..1_000_000.0) {
            let rounded = Amount::from_coins_f64(value).unwrap().to_coins_f64();
            prop_assert!((rounded - value).abs() <= 0.5e-8 + 1e-9);
        }
    }
}
