//! Exact decimal token amounts.

use alloy_primitives::U256;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Largest scale for which `10^scale` still fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

/// A non-negative decimal amount: `raw / 10^decimals`.
///
/// Comparison is exact and independent of the scale, so `1.50` equals `1.5`
/// and a raw on-chain balance of `1_500_000` with 6 decimals equals `1.5`.
/// Deserializes from a decimal string or a JSON integer, never a float.
#[derive(Clone, Copy)]
pub struct Amount {
    raw: U256,
    decimals: u8,
}

/// An amount could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,
    #[error("invalid amount {0:?}: expected digits with an optional fractional part")]
    Invalid(String),
    #[error("negative amounts are not supported: {0:?}")]
    Negative(String),
    #[error("amount {0:?} does not fit in 256 bits")]
    Overflow(String),
    #[error("{0} decimals exceeds the maximum of {MAX_DECIMALS}")]
    TooManyDecimals(usize),
}

fn ten_pow(exp: u8) -> U256 {
    U256::from(10u64).pow(U256::from(exp))
}

impl Amount {
    /// Zero, at scale 0.
    pub const fn zero() -> Self {
        Self {
            raw: U256::ZERO,
            decimals: 0,
        }
    }

    /// Builds an amount from on-chain raw units and the token's decimals.
    pub fn from_raw(raw: U256, decimals: u8) -> Result<Self, AmountParseError> {
        if decimals > MAX_DECIMALS {
            return Err(AmountParseError::TooManyDecimals(decimals.into()));
        }
        Ok(Self { raw, decimals })
    }

    /// Raw units at this amount's scale.
    pub fn raw(&self) -> U256 {
        self.raw
    }

    /// Number of fractional decimal places of [`raw`](Self::raw).
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Returns `true` if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    fn split(&self) -> (U256, U256) {
        let unit = ten_pow(self.decimals);
        (self.raw / unit, self.raw % unit)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self {
            raw: U256::from(value),
            decimals: 0,
        }
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        let (self_int, self_frac) = self.split();
        let (other_int, other_frac) = other.split();
        self_int.cmp(&other_int).then_with(|| {
            // Both fractions are < 10^decimals, so rescaling to the larger
            // scale stays below 10^MAX_DECIMALS.
            let scale = self.decimals.max(other.decimals);
            let lhs = self_frac * ten_pow(scale - self.decimals);
            let rhs = other_frac * ten_pow(scale - other.decimals);
            lhs.cmp(&rhs)
        })
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Amount {}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (int, frac) = self.split();
        if frac.is_zero() {
            return write!(f, "{int}");
        }
        let digits = format!("{:0>width$}", frac.to_string(), width = self.decimals as usize);
        write!(f, "{int}.{}", digits.trim_end_matches('0'))
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({self})")
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountParseError::Empty);
        }
        if s.starts_with('-') {
            return Err(AmountParseError::Negative(s.to_string()));
        }

        let (int, frac) = match s.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (s, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int.is_empty() || !all_digits(int) || !all_digits(frac) || (s.contains('.') && frac.is_empty()) {
            return Err(AmountParseError::Invalid(s.to_string()));
        }
        if frac.len() > MAX_DECIMALS as usize {
            return Err(AmountParseError::TooManyDecimals(frac.len()));
        }

        let digits = format!("{int}{frac}");
        let raw = U256::from_str_radix(&digits, 10)
            .map_err(|_| AmountParseError::Overflow(s.to_string()))?;
        Self::from_raw(raw, frac.len() as u8)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct AmountVisitor;

impl de::Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal string such as \"1.5\" or a non-negative integer")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        Ok(Amount::from(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        match u64::try_from(value) {
            Ok(value) => Ok(Amount::from(value)),
            Err(_) => Err(E::custom(AmountParseError::Negative(value.to_string()))),
        }
    }

    // A float has already lost digits by the time it gets here.
    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
        Err(E::custom(format_args!(
            "JSON number {value} is not exact; write fractional amounts as decimal strings such as \"1.5\""
        )))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
