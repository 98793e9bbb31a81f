//! String-level sharing: secrets in, share strings out, and back.

use log::debug;
use rand::{CryptoRng, RngCore};
use std::collections::hash_map::{Entry, HashMap};
use std::sync::Arc;
use zeroize::Zeroizing;

use crate::codec::{bits_to_hex, hex_to_bits, hex_to_text, join_chunks, split_bits, text_to_hex};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::math::galois::Field;
use crate::protocol::ShareString;
use crate::sharing::{reconstruct, Dealer};

/// Bounds on the size of generated random secrets.
const RANDOM_BITS: std::ops::RangeInclusive<usize> = 2..=65536;

/// Splits and combines secrets according to a set of [`Settings`].
///
/// Secrets are hex strings (or text, through the `*_text` methods). A `1` bit is prepended to
/// the secret before splitting so leading zeros survive the round trip.
#[derive(Debug, Clone)]
pub struct Secrets {
    settings: Settings,
    field: Arc<Field>,
}

impl Secrets {
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let field = Field::shared(settings.bits)?;
        Ok(Self { settings, field })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Field new shares are created in.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Splits a hex secret into `num_shares` share strings, any `threshold` of which recover it.
    pub fn share_hex<R: RngCore + CryptoRng>(
        &self,
        secret: &str,
        num_shares: u32,
        threshold: u32,
        rng: &mut R,
    ) -> Result<Vec<String>> {
        if secret.is_empty() {
            return Err(Error::EmptySecret);
        }

        let field = &*self.field;
        let bits = field.bits();
        let dealer = Dealer::new(field, threshold, num_shares)?;

        let marked = Zeroizing::new(format!("1{}", hex_to_bits(secret)?));
        let chunks = Zeroizing::new(split_bits(
            &marked,
            bits.into(),
            Some(self.settings.pad_length),
        )?);

        dealer
            .split(field, &chunks, rng)?
            .into_iter()
            .map(|points| {
                let id = points.first().map_or(0, |p| p.x);
                let ys: Vec<u32> = points.iter().map(|p| p.y).collect();
                let data = bits_to_hex(&join_chunks(&ys, bits.into()))?;
                ShareString::new(bits, id, data)?.encode(self.settings.radix)
            })
            .collect()
    }

    /// Splits UTF-8 text, see [`Secrets::share_hex`].
    pub fn share_text<R: RngCore + CryptoRng>(
        &self,
        secret: &str,
        num_shares: u32,
        threshold: u32,
        rng: &mut R,
    ) -> Result<Vec<String>> {
        let hex = Zeroizing::new(text_to_hex(secret));
        self.share_hex(&hex, num_shares, threshold, rng)
    }

    /// Recovers the hex secret from share strings.
    ///
    /// With fewer shares than the threshold the result is wrong rather than an error, unless the
    /// garbage happens not to decode.
    pub fn combine_hex<S: AsRef<str>>(&self, shares: &[S]) -> Result<String> {
        let shares = self.parse_shares(shares)?;
        let bits = Zeroizing::new(self.interpolate(&shares, 0)?);

        // Everything up to and including the marker bit is padding.
        let secret = match bits.find('1') {
            Some(marker) => &bits[marker + 1..],
            None => return Err(Error::InconsistentShares),
        };
        bits_to_hex(secret)
    }

    /// Recovers UTF-8 text, see [`Secrets::combine_hex`].
    pub fn combine_text<S: AsRef<str>>(&self, shares: &[S]) -> Result<String> {
        let hex = Zeroizing::new(self.combine_hex(shares)?);
        hex_to_text(&hex)
    }

    /// Creates the share with index `id` from at least `threshold` existing shares.
    ///
    /// The new share is interchangeable with the ones produced by the original split. Asking for
    /// an id that is already present reproduces that share.
    pub fn new_share<S: AsRef<str>>(&self, id: u32, shares: &[S]) -> Result<String> {
        let shares = self.parse_shares(shares)?;
        let first = &shares[0];
        let bits = first.bits();

        // Validates the id before any work is done.
        ShareString::new(bits, id, "")?;

        let joined = self.interpolate(&shares, id)?;
        let hex = bits_to_hex(&joined)?;

        // Interpolation may add whole zero digits in front, trim back to the input width.
        let width = first.data().len();
        let excess = hex.len().saturating_sub(width);
        let data = match hex.split_at(excess) {
            (pad, data) if pad.bytes().all(|b| b == b'0') => data,
            _ => hex.as_str(),
        };
        ShareString::new(bits, id, data)?.encode(self.settings.radix)
    }

    /// Generates a random hex secret of `bits` bits.
    pub fn random<R: RngCore + CryptoRng>(&self, bits: usize, rng: &mut R) -> Result<String> {
        if !RANDOM_BITS.contains(&bits) {
            return Err(Error::RandomBits(bits));
        }

        let mut bytes = Zeroizing::new(vec![0u8; (bits + 7) / 8]);
        rng.fill_bytes(&mut bytes);
        let all: Zeroizing<String> =
            Zeroizing::new(bytes.iter().map(|b| format!("{b:08b}")).collect());
        bits_to_hex(&all[..bits])
    }

    // Parses, deduplicates and checks that the shares can be combined together.
    fn parse_shares<S: AsRef<str>>(&self, shares: &[S]) -> Result<Vec<ShareString>> {
        let mut parsed: Vec<ShareString> = Vec::with_capacity(shares.len());
        let mut index = HashMap::new();

        for share in shares {
            let share = ShareString::parse(share.as_ref(), self.settings.radix)?;
            if let Some(first) = parsed.first().map(ShareString::bits) {
                if share.bits() != first {
                    return Err(Error::MixedBits {
                        expected: first,
                        found: share.bits(),
                    });
                }
            }

            match index.entry(share.id()) {
                Entry::Occupied(seen) if parsed[*seen.get()] == share => continue,
                Entry::Occupied(_) => return Err(Error::DuplicateShare(share.id())),
                Entry::Vacant(slot) => {
                    slot.insert(parsed.len());
                    parsed.push(share);
                }
            }
        }

        if parsed.len() < 2 {
            return Err(Error::InsufficientShares(parsed.len()));
        }
        let width = parsed[0].data().len();
        if parsed.iter().any(|s| s.data().len() != width) {
            return Err(Error::InconsistentShares);
        }

        Ok(parsed)
    }

    // Evaluates every chunk at `at` and joins the results into one bit-string.
    fn interpolate(&self, shares: &[ShareString], at: u32) -> Result<String> {
        let bits = shares[0].bits();
        let field = Field::shared(bits)?;
        debug!(
            "combining {} shares over GF(2^{}) at x = {}",
            shares.len(),
            bits,
            at
        );

        let xs: Vec<u32> = shares.iter().map(ShareString::id).collect();
        let ys = shares
            .iter()
            .map(|s| split_bits(&hex_to_bits(s.data())?, bits.into(), None))
            .collect::<Result<Vec<_>>>()?;

        let chunks = reconstruct(&field, at, &xs, &ys)?;
        Ok(join_chunks(&chunks, bits.into()))
    }
}
