use crate::codec::MAX_PADDING;
use crate::error::{Error, Result};
use crate::math::galois::{check_bits, DEFAULT_BITS};
use crate::protocol::{check_radix, DEFAULT_RADIX};

/// Parameters of a [`Secrets`](crate::Secrets) engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Width of the field new shares are created in.
    pub bits: u8,
    /// Radix share ids are written in.
    pub radix: u32,
    /// Pad the secret to a multiple of this many bits before sharing, hiding its length. 0 and 1
    /// disable padding.
    pub pad_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bits: DEFAULT_BITS,
            radix: DEFAULT_RADIX,
            pad_length: 0,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        check_bits(self.bits)?;
        check_radix(self.radix)?;
        if self.pad_length > MAX_PADDING {
            return Err(Error::PaddingTooLarge {
                multiple: self.pad_length,
                max: MAX_PADDING,
            });
        }
        Ok(())
    }

    /// Reads settings from a JSON object such as `{"bits": 8, "radix": 16, "pad_length": 128}`.
    ///
    /// Missing keys keep their defaults. Unknown keys are rejected.
    pub fn from_json(src: &str) -> Result<Self> {
        let value = json::parse(src)?;
        if !value.is_object() {
            return Err(Error::InvalidSettings("expected a JSON object".into()));
        }

        let mut settings = Self::default();
        for (key, v) in value.entries() {
            let invalid = || Error::InvalidSettings(format!("bad value for {key:?}: {v}"));
            match key {
                "bits" => settings.bits = v.as_u8().ok_or_else(invalid)?,
                "radix" => settings.radix = v.as_u32().ok_or_else(invalid)?,
                "pad_length" => settings.pad_length = v.as_usize().ok_or_else(invalid)?,
                other => return Err(Error::InvalidSettings(format!("unknown key {other:?}"))),
            }
        }

        settings.validate()?;
        Ok(settings)
    }
}
