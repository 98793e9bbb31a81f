use std::fmt;
use std::str::FromStr;

use crate::codec::to_radix;
use crate::error::{Error, Result};
use crate::math::galois::{check_bits, MAX_BITS, MIN_BITS};

/// Radix of share ids when nothing else is configured.
pub const DEFAULT_RADIX: u32 = 16;

/// One share in its transport form.
///
/// Encoded as `{bits}{id}{data}` where `bits` is the field width as a single base-36 digit,
/// `id` is the share index zero-padded to the number of digits of the largest index
/// (`2^bits - 1`) in the configured radix, and `data` is the hex payload.
///
/// The encoding carries everything needed to combine, so shares can be stored and passed around
/// without any other metadata. Only the radix has to be agreed on out of band.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShareString {
    bits: u8,
    id: u32,
    data: String,
}

impl ShareString {
    pub fn new(bits: u8, id: u32, data: impl Into<String>) -> Result<Self> {
        check_bits(bits)?;
        let max = max_id(bits);
        if id == 0 || id > max {
            return Err(Error::ShareIdOutOfRange { id, max });
        }

        let data = data.into().to_ascii_lowercase();
        if let Some(c) = data.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(Error::InvalidHex(c));
        }

        Ok(Self { bits, id, data })
    }

    /// Parses a share whose id is written in `radix`.
    pub fn parse(share: &str, radix: u32) -> Result<Self> {
        check_radix(radix)?;
        let malformed = || Error::MalformedShare(share.to_owned());

        let mut chars = share.chars();
        let bits = chars
            .next()
            .and_then(|c| c.to_digit(36))
            .ok_or_else(malformed)?;
        let bits = u8::try_from(bits).map_err(|_| malformed())?;
        check_bits(bits)?;

        let rest = chars.as_str();
        let width = id_width(bits, radix)?;
        if rest.len() <= width || !rest.is_char_boundary(width) {
            return Err(malformed());
        }

        let (id, data) = rest.split_at(width);
        if !id.chars().all(|c| c.is_digit(radix)) {
            return Err(malformed());
        }
        let id = u32::from_str_radix(id, radix).map_err(|_| malformed())?;

        Self::new(bits, id, data)
    }

    /// Formats the share with its id in `radix`.
    pub fn encode(&self, radix: u32) -> Result<String> {
        check_radix(radix)?;
        let tag = char::from_digit(self.bits.into(), 36)
            .ok_or(Error::UnsupportedBits {
                bits: self.bits.into(),
                min: MIN_BITS,
                max: MAX_BITS,
            })?
            .to_ascii_uppercase();
        let id = to_radix(self.id, radix)?;
        let width = id_width(self.bits, radix)?;
        Ok(format!("{tag}{id:0>width$}{}", self.data))
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Hex payload.
    pub fn data(&self) -> &str {
        &self.data
    }
}

impl fmt::Display for ShareString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.encode(DEFAULT_RADIX).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl FromStr for ShareString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, DEFAULT_RADIX)
    }
}

/// Builds the encoded share for `id` over a `bits`-wide field.
pub fn construct(bits: u8, id: u32, data: &str, radix: u32) -> Result<String> {
    ShareString::new(bits, id, data)?.encode(radix)
}

/// Largest share id for a field width.
pub fn max_id(bits: u8) -> u32 {
    (1u32 << bits) - 1
}

/// Number of digits the share id takes up.
pub fn id_width(bits: u8, radix: u32) -> Result<usize> {
    Ok(to_radix(max_id(bits), radix)?.len())
}

pub(crate) fn check_radix(radix: u32) -> Result<()> {
    if (2..=36).contains(&radix) {
        Ok(())
    } else {
        Err(Error::UnsupportedRadix(radix))
    }
}
