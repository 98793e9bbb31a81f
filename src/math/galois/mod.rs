use log::debug;
use rand::{CryptoRng, RngCore};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::error::{Error, Result};

/// Smallest supported field width.
pub const MIN_BITS: u8 = 3;

/// Largest supported field width. 2^20 - 1 shares is already far beyond practical use.
pub const MAX_BITS: u8 = 20;

/// Field width used when nothing else is configured.
pub const DEFAULT_BITS: u8 = 8;

// Primitive polynomials for GF(2^n), indexed by n, with the x^n term dropped.
const PRIMITIVE_POLYNOMIALS: [u32; MAX_BITS as usize + 1] = [
    0, 0, 1, 3, 3, 5, 3, 3, 29, 17, 9, 5, 83, 27, 43, 3, 45, 9, 39, 39, 9,
];

/// Returns the default primitive polynomial for a field of the given width.
pub fn default_primitive(bits: u8) -> Result<u32> {
    check_bits(bits)?;
    Ok(PRIMITIVE_POLYNOMIALS[bits as usize])
}

pub(crate) fn check_bits(bits: u8) -> Result<()> {
    if (MIN_BITS..=MAX_BITS).contains(&bits) {
        Ok(())
    } else {
        Err(Error::UnsupportedBits {
            bits: bits.into(),
            min: MIN_BITS,
            max: MAX_BITS,
        })
    }
}

/// Galois field GF(2^bits) backed by discrete-log and antilog tables.
///
/// Elements are plain `u32` values in `0..=order()`. Addition and subtraction are XOR, products
/// and quotients go through the tables with generator 2.
///
/// A `Field` is immutable once built. Use [`Field::shared`] to get the process-wide instance for
/// a width, or [`Field::new`] for an independent one.
#[derive(Clone, PartialEq, Eq)]
pub struct Field {
    bits: u8,
    primitive: u32,
    logs: Vec<u32>,
    exps: Vec<u32>,
}

impl Field {
    /// Generates the log/antilog tables for GF(2^bits) under `primitive`.
    ///
    /// Fails if the generator does not walk through every non-zero element, i.e. if `primitive`
    /// is not primitive for this width.
    pub fn new(bits: u8, primitive: u32) -> Result<Self> {
        check_bits(bits)?;

        let size = 1u32 << bits;
        let order = size - 1;
        let not_primitive = |cycle: u32| Error::NotPrimitive {
            bits,
            polynomial: primitive,
            cycle: cycle as usize,
        };

        if primitive == 0 || primitive >= size {
            return Err(not_primitive(0));
        }

        let mut logs = vec![0; size as usize];
        let mut exps = vec![0; order as usize];
        let mut seen = vec![false; size as usize];

        let mut x = 1u32;
        for i in 0..order {
            if x == 0 || seen[x as usize] {
                return Err(not_primitive(i));
            }
            seen[x as usize] = true;
            exps[i as usize] = x;
            logs[x as usize] = i;

            x <<= 1;
            if x >= size {
                x ^= size;
                x ^= primitive;
            }
        }

        debug!("generated GF(2^{}) tables for polynomial {}", bits, primitive);

        Ok(Self {
            bits,
            primitive,
            logs,
            exps,
        })
    }

    /// Builds the field with the default primitive polynomial for `bits`.
    pub fn with_bits(bits: u8) -> Result<Self> {
        Self::new(bits, default_primitive(bits)?)
    }

    /// Returns the cached field for `(bits, primitive)`, building it on first use.
    pub fn cached(bits: u8, primitive: u32) -> Result<Arc<Self>> {
        static CACHE: OnceLock<Mutex<HashMap<(u8, u32), Arc<Field>>>> = OnceLock::new();

        let cache = CACHE.get_or_init(Default::default);
        // Entries are only inserted fully built, so a poisoned map is still consistent.
        let mut fields = cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(field) = fields.get(&(bits, primitive)) {
            return Ok(Arc::clone(field));
        }

        let field = Arc::new(Self::new(bits, primitive)?);
        fields.insert((bits, primitive), Arc::clone(&field));
        Ok(field)
    }

    /// Returns the cached field for `bits` with its default primitive polynomial.
    pub fn shared(bits: u8) -> Result<Arc<Self>> {
        Self::cached(bits, default_primitive(bits)?)
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn primitive(&self) -> u32 {
        self.primitive
    }

    /// Number of non-zero elements, which is also the largest element and the largest share id.
    pub fn order(&self) -> u32 {
        self.exps.len() as u32
    }

    /// Number of bytes drawn from the random source per element.
    pub fn num_bytes(&self) -> usize {
        (self.bits as usize + 7) / 8
    }

    pub fn contains(&self, a: u32) -> bool {
        a <= self.order()
    }

    /// Discrete logarithm of `a`. Zero has none.
    pub fn log(&self, a: u32) -> Option<u32> {
        match a {
            0 => None,
            a => self.logs.get(a as usize).copied(),
        }
    }

    /// Generator raised to `e`, with `e` taken modulo the order.
    pub fn exp(&self, e: u32) -> u32 {
        self.exps[(e % self.order()) as usize]
    }

    pub fn add(&self, a: u32, b: u32) -> u32 {
        a ^ b
    }

    pub fn sub(&self, a: u32, b: u32) -> u32 {
        a ^ b
    }

    /// Field product, or `None` when an operand is not an element of the field.
    pub fn mul(&self, a: u32, b: u32) -> Option<u32> {
        if !self.contains(a) || !self.contains(b) {
            return None;
        }
        match (self.log(a), self.log(b)) {
            (Some(la), Some(lb)) => Some(self.exp(la + lb)),
            _ => Some(0),
        }
    }

    /// Field quotient, or `None` when dividing by zero or an operand is not an element.
    pub fn div(&self, a: u32, b: u32) -> Option<u32> {
        if !self.contains(a) {
            return None;
        }
        let lb = self.log(b)?;
        match self.log(a) {
            Some(la) => Some(self.exp(la + self.order() - lb)),
            None => Some(0),
        }
    }

    /// Samples an element uniformly at random.
    ///
    /// Draws `num_bytes()` bytes and keeps the leading `bits` bits.
    pub fn random<R: RngCore + CryptoRng>(&self, rng: &mut R) -> u32 {
        let mut buf = [0u8; 4];
        let n = self.num_bytes();
        rng.fill_bytes(&mut buf[..n]);

        let value = buf[..n]
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
        value >> (8 * n as u32 - u32::from(self.bits))
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("bits", &self.bits)
            .field("primitive", &self.primitive)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn tables_cover_every_non_zero_element() {
        let field = Field::with_bits(8).unwrap();
        assert_eq!(field.order(), 255);
        for v in 1..=255 {
            assert_eq!(field.exp(field.log(v).unwrap()), v);
        }
        assert_eq!(field.log(0), None);
    }

    #[test]
    fn tables_are_deterministic() {
        let a = Field::new(8, 29).unwrap();
        let b = Field::new(8, 29).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.exps[..8], [1, 2, 4, 8, 16, 32, 64, 128]);
        // 256 ^ 256 ^ 29
        assert_eq!(a.exp(8), 29);
    }

    #[test]
    fn every_supported_width_has_a_primitive_default() {
        for bits in MIN_BITS..=MAX_BITS {
            let field = Field::with_bits(bits).unwrap();
            assert_eq!(field.order(), (1 << bits) - 1);
        }
    }

    #[test]
    fn rejects_non_primitive_polynomial() {
        // x^8 + x^4 + x^3 + x + 1 is irreducible but 2 only generates 51 elements.
        let err = Field::new(8, 27).unwrap_err();
        assert_eq!(
            err,
            Error::NotPrimitive {
                bits: 8,
                polynomial: 27,
                cycle: 51
            }
        );
        assert!(Field::new(8, 0).is_err());
        assert!(Field::new(8, 256).is_err());
    }

    #[test]
    fn rejects_unsupported_width() {
        assert!(matches!(
            Field::with_bits(2),
            Err(Error::UnsupportedBits { bits: 2, .. })
        ));
        assert!(Field::with_bits(21).is_err());
    }

    #[test]
    fn mul_and_div_are_inverse() {
        let field = Field::with_bits(8).unwrap();
        for a in 0..=255 {
            for b in 1..=255 {
                let p = field.mul(a, b).unwrap();
                assert_eq!(field.div(p, b), Some(a));
            }
        }
        assert_eq!(field.div(7, 0), None);
        assert_eq!(field.mul(0, 9), Some(0));
        assert_eq!(field.mul(9, 1), Some(9));
    }

    #[test]
    fn operands_outside_the_field_have_no_product() {
        let field = Field::with_bits(8).unwrap();
        assert_eq!(field.mul(256, 3), None);
        assert_eq!(field.mul(3, 256), None);
        assert_eq!(field.mul(0, 1000), None);
        assert_eq!(field.mul(255, 255), Some(field.exp(2 * field.log(255).unwrap())));
        assert_eq!(field.div(256, 3), None);
        assert_eq!(field.div(3, 256), None);
        assert_eq!(field.div(0, 256), None);
    }

    #[test]
    fn mul_distributes_over_add() {
        let field = Field::with_bits(8).unwrap();
        for (a, b, c) in [(3, 7, 200), (255, 1, 128), (17, 34, 51)] {
            let ab = field.mul(a, b).unwrap();
            let ac = field.mul(a, c).unwrap();
            assert_eq!(field.mul(a, field.add(b, c)), Some(field.add(ab, ac)));
        }
    }

    #[test]
    fn cache_returns_the_same_instance() {
        let a = Field::shared(8).unwrap();
        let b = Field::cached(8, 29).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, Field::new(8, 29).unwrap());
    }

    #[test]
    fn random_elements_stay_in_field() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for bits in [3, 8, 12, 20] {
            let field = Field::with_bits(bits).unwrap();
            for _ in 0..200 {
                assert!(field.contains(field.random(&mut rng)));
            }
        }
    }
}
