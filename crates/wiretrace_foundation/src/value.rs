//! Three-valued signal values.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, ErrorKind, Result};

/// A single three-valued logic digit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Logic {
    /// Logic low.
    Zero,
    /// Logic high.
    One,
    /// Unknown or uninitialized.
    Undefined,
}

impl Logic {
    /// Parses a logic digit (`0`, `1`, `x` or `X`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidLogic` for any other character.
    pub fn from_char(digit: char) -> Result<Self> {
        match digit {
            '0' => Ok(Self::Zero),
            '1' => Ok(Self::One),
            'x' | 'X' => Ok(Self::Undefined),
            other => Err(Error::invalid_logic(other)),
        }
    }

    /// Returns the display character for this digit.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Zero => '0',
            Self::One => '1',
            Self::Undefined => 'x',
        }
    }

    /// Returns true unless the digit is undefined.
    #[must_use]
    pub const fn is_defined(self) -> bool {
        !matches!(self, Self::Undefined)
    }
}

impl From<bool> for Logic {
    fn from(value: bool) -> Self {
        if value { Self::One } else { Self::Zero }
    }
}

/// A fixed-width vector of logic digits.
///
/// Digit 0 is the least significant. Cloning is O(1): the digits are shared.
#[derive(Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitVector {
    digits: Arc<[Logic]>,
}

impl BitVector {
    /// Creates a vector of `width` copies of `fill`.
    ///
    /// # Errors
    ///
    /// Returns `ZeroWidth` if `width` is 0.
    pub fn filled(width: usize, fill: Logic) -> Result<Self> {
        if width == 0 {
            return Err(Error::new(ErrorKind::ZeroWidth));
        }
        Ok(Self {
            digits: vec![fill; width].into(),
        })
    }

    /// Creates an all-undefined vector, the state of a wire before its
    /// first evaluation.
    ///
    /// # Errors
    ///
    /// Returns `ZeroWidth` if `width` is 0.
    pub fn undefined(width: usize) -> Result<Self> {
        Self::filled(width, Logic::Undefined)
    }

    /// Creates a `width`-bit vector holding the low bits of `value`.
    ///
    /// Digits above bit 63 are zero.
    ///
    /// # Errors
    ///
    /// Returns `ZeroWidth` if `width` is 0.
    pub fn from_u64(width: usize, value: u64) -> Result<Self> {
        if width == 0 {
            return Err(Error::new(ErrorKind::ZeroWidth));
        }
        let digits = (0..width)
            .map(|bit| Logic::from(bit < 64 && (value >> bit) & 1 == 1))
            .collect();
        Ok(Self { digits })
    }

    /// Creates a single-bit vector.
    #[must_use]
    pub fn bit(value: bool) -> Self {
        Self {
            digits: Arc::from([Logic::from(value)]),
        }
    }

    /// Creates a vector from digits, least significant first.
    ///
    /// # Errors
    ///
    /// Returns `ZeroWidth` if `digits` is empty.
    pub fn from_digits(digits: impl IntoIterator<Item = Logic>) -> Result<Self> {
        let digits: Arc<[Logic]> = digits.into_iter().collect();
        if digits.is_empty() {
            return Err(Error::new(ErrorKind::ZeroWidth));
        }
        Ok(Self { digits })
    }

    /// Returns the number of digits.
    #[must_use]
    pub fn width(&self) -> usize {
        self.digits.len()
    }

    /// Returns the digit at `index` (0 = least significant).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Logic> {
        self.digits.get(index).copied()
    }

    /// Returns an iterator over digits, least significant first.
    pub fn digits(&self) -> impl Iterator<Item = Logic> + '_ {
        self.digits.iter().copied()
    }

    /// Returns true if no digit is undefined.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.digits.iter().all(|d| d.is_defined())
    }

    /// Interprets the vector as an unsigned integer.
    ///
    /// Returns `None` if any digit is undefined or the value does not fit
    /// in 64 bits.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        let mut value = 0u64;
        for (bit, digit) in self.digits.iter().enumerate() {
            match digit {
                Logic::Zero => {}
                Logic::One if bit < 64 => value |= 1 << bit,
                Logic::One | Logic::Undefined => return None,
            }
        }
        Some(value)
    }
}

impl FromStr for BitVector {
    type Err = Error;

    /// Parses digits written most significant first, e.g. `"01x1"`.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .chars()
            .rev()
            .map(Logic::from_char)
            .collect::<Result<Vec<_>>>()?;
        Self::from_digits(digits)
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVector({}'{self})", self.width())
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.digits.iter().rev() {
            write!(f, "{}", digit.to_char())?;
        }
        Ok(())
    }
}
