use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive};

use crate::{ErrorCode, GdvError};

/// An arbitrary-precision integer with a small-integer fast path.
///
/// Values that fit in `i64` are always stored inline; only values outside
/// that range allocate a [`BigInt`]. The two representations compare and
/// hash as one numeric domain because the choice is canonical.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GdvInteger(IntegerRepr);

#[derive(Clone, PartialEq, Eq, Hash)]
enum IntegerRepr {
    Small(i64),
    Large(BigInt),
}

impl GdvInteger {
    /// Zero.
    pub const ZERO: Self = Self(IntegerRepr::Small(0));

    /// Construct from an `i64`.
    #[inline]
    #[must_use]
    pub const fn from_i64(value: i64) -> Self {
        Self(IntegerRepr::Small(value))
    }

    /// Construct from a [`BigInt`], demoting to the small form when it fits.
    #[must_use]
    pub fn from_big(value: BigInt) -> Self {
        match value.to_i64() {
            Some(small) => Self(IntegerRepr::Small(small)),
            None => Self(IntegerRepr::Large(value)),
        }
    }

    /// Parse an optionally signed, optionally radix-prefixed digit string.
    ///
    /// Accepts `-`, then `0b`/`0o`/`0x` (either case), then digits in that
    /// radix (decimal without a prefix). The empty string is zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDigits` for a lone `-`, a prefix with no digits, or any
    /// character that is not a digit in the selected radix.
    pub fn from_digits(digits: &str) -> Result<Self, GdvError> {
        if digits.is_empty() {
            return Ok(Self::ZERO);
        }
        let (negative, rest) = match digits.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, digits),
        };
        let (radix, body) = split_radix_prefix(rest);
        if body.is_empty() {
            return Err(invalid_digits(digits));
        }
        let magnitude = parse_magnitude(body, radix).ok_or_else(|| invalid_digits(digits))?;
        Ok(Self::from_big(if negative { -magnitude } else { magnitude }))
    }

    /// Parse an optionally signed digit string in `radix` (2..=36), with no
    /// prefix.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOptions` for an unsupported radix, and `InvalidDigits`
    /// for an empty body or a non-digit.
    pub fn from_radix_digits(digits: &str, radix: u32) -> Result<Self, GdvError> {
        if !(2..=36).contains(&radix) {
            return Err(GdvError::new(
                ErrorCode::InvalidOptions,
                format!("unsupported radix {radix}"),
            ));
        }
        let (negative, body) = match digits.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, digits),
        };
        if body.is_empty() {
            return Err(invalid_digits(digits));
        }
        let magnitude = parse_magnitude(body, radix).ok_or_else(|| invalid_digits(digits))?;
        Ok(Self::from_big(if negative { -magnitude } else { magnitude }))
    }

    /// Render in `radix` (2..=36) with upper-case letters.
    ///
    /// With `with_indicator`, radixes 2, 8 and 16 get a `0b`/`0o`/`0x`
    /// prefix after any sign.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOptions` for an unsupported radix.
    pub fn to_radix_digits(&self, radix: u32, with_indicator: bool) -> Result<String, GdvError> {
        if !(2..=36).contains(&radix) {
            return Err(GdvError::new(
                ErrorCode::InvalidOptions,
                format!("unsupported radix {radix}"),
            ));
        }
        let mut out = String::new();
        if self.is_negative() {
            out.push('-');
        }
        if with_indicator {
            out.push_str(match radix {
                2 => "0b",
                8 => "0o",
                16 => "0x",
                _ => "",
            });
        }
        let magnitude = match &self.0 {
            IntegerRepr::Small(v) => BigInt::from(v.unsigned_abs()),
            IntegerRepr::Large(v) => v.abs(),
        };
        out.push_str(&magnitude.to_str_radix(radix).to_ascii_uppercase());
        Ok(out)
    }

    /// True if stored inline as `i64`.
    #[inline]
    #[must_use]
    pub const fn is_small(&self) -> bool {
        matches!(self.0, IntegerRepr::Small(_))
    }

    /// True unless a large representation holds a value that fits `i64`.
    pub(crate) fn is_normalized(&self) -> bool {
        match &self.0 {
            IntegerRepr::Small(_) => true,
            IntegerRepr::Large(v) => v.to_i64().is_none(),
        }
    }

    /// True if strictly below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match &self.0 {
            IntegerRepr::Small(v) => *v < 0,
            IntegerRepr::Large(v) => v.sign() == Sign::Minus,
        }
    }

    /// True if zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        matches!(self.0, IntegerRepr::Small(0))
    }

    /// The value as `i64`, if it is small.
    #[inline]
    #[must_use]
    pub const fn get_as_small(&self) -> Option<i64> {
        match &self.0 {
            IntegerRepr::Small(v) => Some(*v),
            IntegerRepr::Large(_) => None,
        }
    }

    /// The value as a [`BigInt`], whichever representation it uses.
    #[must_use]
    pub fn get_as_big(&self) -> BigInt {
        match &self.0 {
            IntegerRepr::Small(v) => BigInt::from(*v),
            IntegerRepr::Large(v) => v.clone(),
        }
    }

    /// The value converted to `T`, or `None` if it does not fit.
    #[must_use]
    pub fn get_as_opt<T>(&self) -> Option<T>
    where
        T: TryFrom<i64> + for<'a> TryFrom<&'a BigInt>,
    {
        match &self.0 {
            IntegerRepr::Small(v) => T::try_from(*v).ok(),
            IntegerRepr::Large(v) => T::try_from(v).ok(),
        }
    }

    /// Checked division; `None` when `divisor` is zero.
    #[must_use]
    pub fn checked_div(&self, divisor: &Self) -> Option<Self> {
        if divisor.is_zero() {
            return None;
        }
        if let (IntegerRepr::Small(a), IntegerRepr::Small(b)) = (&self.0, &divisor.0) {
            if let Some(q) = a.checked_div(*b) {
                return Some(Self::from_i64(q));
            }
        }
        Some(Self::from_big(self.get_as_big() / divisor.get_as_big()))
    }

    /// Checked remainder; `None` when `divisor` is zero.
    #[must_use]
    pub fn checked_rem(&self, divisor: &Self) -> Option<Self> {
        if divisor.is_zero() {
            return None;
        }
        if let (IntegerRepr::Small(a), IntegerRepr::Small(b)) = (&self.0, &divisor.0) {
            if let Some(r) = a.checked_rem(*b) {
                return Some(Self::from_i64(r));
            }
        }
        Some(Self::from_big(self.get_as_big() % divisor.get_as_big()))
    }
}

fn split_radix_prefix(s: &str) -> (u32, &str) {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'b' | b'B' => 2,
            b'o' | b'O' => 8,
            b'x' | b'X' => 16,
            _ => return (10, s),
        };
        return (radix, &s[2..]);
    }
    (10, s)
}

/// Digits only: no sign, no separators.
fn parse_magnitude(body: &str, radix: u32) -> Option<BigInt> {
    if !body.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    if body.len() <= 15 {
        if let Ok(v) = i64::from_str_radix(body, radix) {
            return Some(BigInt::from(v));
        }
    }
    BigInt::parse_bytes(body.as_bytes(), radix)
}

fn invalid_digits(digits: &str) -> GdvError {
    GdvError::new(
        ErrorCode::InvalidDigits,
        format!("invalid integer digits: \"{digits}\""),
    )
}

impl Default for GdvInteger {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Ord for GdvInteger {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (IntegerRepr::Small(a), IntegerRepr::Small(b)) => a.cmp(b),
            // A large value is outside i64, so its sign alone decides.
            (IntegerRepr::Small(_), IntegerRepr::Large(b)) => {
                if b.sign() == Sign::Minus {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (IntegerRepr::Large(a), IntegerRepr::Small(_)) => {
                if a.sign() == Sign::Minus {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (IntegerRepr::Large(a), IntegerRepr::Large(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for GdvInteger {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GdvInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            IntegerRepr::Small(v) => fmt::Display::fmt(v, f),
            IntegerRepr::Large(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl fmt::Debug for GdvInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GdvInteger({self})")
    }
}

impl fmt::UpperHex for GdvInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self
            .to_radix_digits(16, f.alternate())
            .map_err(|_| fmt::Error)?;
        f.write_str(&digits)
    }
}

impl fmt::LowerHex for GdvInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self
            .to_radix_digits(16, f.alternate())
            .map_err(|_| fmt::Error)?;
        f.write_str(&digits.to_ascii_lowercase())
    }
}

impl FromStr for GdvInteger {
    type Err = GdvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_digits(s)
    }
}

macro_rules! impl_from_small {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for GdvInteger {
                fn from(value: $t) -> Self {
                    Self::from_i64(i64::from(value))
                }
            }
        )*
    };
}

macro_rules! impl_from_wide {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for GdvInteger {
                fn from(value: $t) -> Self {
                    match i64::try_from(value) {
                        Ok(small) => Self::from_i64(small),
                        Err(_) => Self(IntegerRepr::Large(BigInt::from(value))),
                    }
                }
            }
        )*
    };
}

impl_from_small!(i8, i16, i32, i64, u8, u16, u32);
impl_from_wide!(u64, i128, u128, isize, usize);

impl From<BigInt> for GdvInteger {
    fn from(value: BigInt) -> Self {
        Self::from_big(value)
    }
}

impl From<&GdvInteger> for BigInt {
    fn from(value: &GdvInteger) -> Self {
        value.get_as_big()
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $checked:ident) => {
        impl $trait<&GdvInteger> for &GdvInteger {
            type Output = GdvInteger;

            fn $method(self, rhs: &GdvInteger) -> GdvInteger {
                if let (IntegerRepr::Small(a), IntegerRepr::Small(b)) = (&self.0, &rhs.0) {
                    if let Some(v) = a.$checked(*b) {
                        return GdvInteger::from_i64(v);
                    }
                }
                GdvInteger::from_big(self.get_as_big().$method(rhs.get_as_big()))
            }
        }

        impl $trait for GdvInteger {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                (&self).$method(&rhs)
            }
        }
    };
}

impl_binop!(Add, add, checked_add);
impl_binop!(Sub, sub, checked_sub);
impl_binop!(Mul, mul, checked_mul);
// Division by zero panics, as it does for the primitive integers.
impl_binop!(Div, div, checked_div);
impl_binop!(Rem, rem, checked_rem);

impl Neg for &GdvInteger {
    type Output = GdvInteger;

    fn neg(self) -> GdvInteger {
        match &self.0 {
            IntegerRepr::Small(v) => match v.checked_neg() {
                Some(n) => GdvInteger::from_i64(n),
                None => GdvInteger::from_big(-BigInt::from(*v)),
            },
            IntegerRepr::Large(v) => GdvInteger::from_big(-v.clone()),
        }
    }
}

impl Neg for GdvInteger {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

