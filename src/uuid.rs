//! The 128-bit identifier that names a component type across modules.
//!
//! Unlike [`ComponentId`](crate::comp::ComponentId), which is a dense index
//! assigned in registration order and never leaves the process, a [`Uuid`] is
//! stable: it is declared once next to the component type and recognized by
//! every registry that ever sees it.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A globally unique identifier for a component type.
///
/// The identifier is an opaque 128-bit value.
/// Its two textual forms are the 32-hex-digit "simple" form and the
/// 8-4-4-4-12 "hyphenated" form; both parse case-insensitively and both can
/// be emitted in either case through the [`simple`](Uuid::simple) and
/// [`hyphenated`](Uuid::hyphenated) adapters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Uuid(u128);

impl Uuid {
    /// Creates a new [`Uuid`] from a 128-bit integer.
    pub const fn from_u128(value: u128) -> Self {
        Self(value)
    }

    /// Creates a new [`Uuid`] from its big-endian byte representation.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(u128::from_be_bytes(bytes))
    }

    /// Returns the identifier as a 128-bit integer.
    pub const fn as_u128(self) -> u128 {
        self.0
    }

    /// Parses an identifier from its textual form.
    ///
    /// Accepts exactly 32 hex digits, or 36 characters with hyphens at
    /// offsets 8, 13, 18 and 23. Both upper- and lower-case digits are
    /// accepted. Anything else is a [`ParseUuidError`].
    pub fn parse_str(text: &str) -> Result<Self, ParseUuidError> {
        let bytes = text.as_bytes();

        let mut value: u128 = 0;
        match bytes.len() {
            32 => {
                for &digit in bytes {
                    value = (value << 4) | u128::from(hex_value(digit)?);
                }
            }
            36 => {
                if bytes[8] != b'-' || bytes[13] != b'-' || bytes[18] != b'-' || bytes[23] != b'-'
                {
                    return Err(ParseUuidError(()));
                }
                for (index, &digit) in bytes.iter().enumerate() {
                    if matches!(index, 8 | 13 | 18 | 23) {
                        continue;
                    }
                    value = (value << 4) | u128::from(hex_value(digit)?);
                }
            }
            _ => return Err(ParseUuidError(())),
        }

        Ok(Self(value))
    }

    /// Returns an adapter that formats the identifier as 32 contiguous hex
    /// digits.
    ///
    /// [`Display`](fmt::Display) renders lower-case digits,
    /// [`UpperHex`](fmt::UpperHex) renders upper-case digits.
    pub const fn simple(self) -> Simple {
        Simple(self)
    }

    /// Returns an adapter that formats the identifier in the hyphenated
    /// 8-4-4-4-12 form.
    ///
    /// [`Display`](fmt::Display) renders lower-case digits,
    /// [`UpperHex`](fmt::UpperHex) renders upper-case digits.
    pub const fn hyphenated(self) -> Hyphenated {
        Hyphenated(self)
    }

    /// Mixes the identifier down to 64 bits.
    ///
    /// The two halves are folded with the rotate-xor-multiply scheme of
    /// `FxHasher`, which is sufficient because identifiers are expected to
    /// carry good entropy to begin with. [`Hash`](std::hash::Hash) feeds this
    /// value through a single `write_u64` call, so identifier-keyed maps can
    /// use a pass-through hasher.
    pub const fn hash64(self) -> u64 {
        const SEED: u64 = 0x517c_c1b7_2722_0a95;

        let mut hash: u64 = 0;
        hash = (hash.rotate_left(5) ^ (self.0 as u64)).wrapping_mul(SEED);
        hash = (hash.rotate_left(5) ^ ((self.0 >> 64) as u64)).wrapping_mul(SEED);
        hash
    }
}

impl std::hash::Hash for Uuid {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash64());
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uuid({:032x})", self.0)
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl FromStr for Uuid {
    type Err = ParseUuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// The error returned when a [`Uuid`] is parsed from malformed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid UUID text: expected 32 hex digits or the 8-4-4-4-12 hyphenated form")]
pub struct ParseUuidError(());

/// Formats a [`Uuid`] as 32 contiguous hex digits.
#[derive(Debug, Clone, Copy)]
pub struct Simple(Uuid);

impl fmt::Display for Simple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0 .0)
    }
}

impl fmt::UpperHex for Simple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032X}", self.0 .0)
    }
}

/// Formats a [`Uuid`] in the hyphenated 8-4-4-4-12 form.
#[derive(Debug, Clone, Copy)]
pub struct Hyphenated(Uuid);

impl Hyphenated {
    fn fields(self) -> (u32, u16, u16, u16, u64) {
        let value = self.0 .0;
        (
            (value >> 96) as u32,
            (value >> 80) as u16,
            (value >> 64) as u16,
            (value >> 48) as u16,
            (value as u64) & 0xffff_ffff_ffff,
        )
    }
}

impl fmt::Display for Hyphenated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b, c, d, e) = self.fields();
        write!(f, "{a:08x}-{b:04x}-{c:04x}-{d:04x}-{e:012x}")
    }
}

impl fmt::UpperHex for Hyphenated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b, c, d, e) = self.fields();
        write!(f, "{a:08X}-{b:04X}-{c:04X}-{d:04X}-{e:012X}")
    }
}

fn hex_value(digit: u8) -> Result<u8, ParseUuidError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(ParseUuidError(())),
    }
}
