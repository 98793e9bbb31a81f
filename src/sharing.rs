use log::trace;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::math::galois::Field;
use crate::math::{evaluate, interpolate};

/// A point on a secret-sharing polynomial. `x` is the share index and never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Secret-sharing polynomial for a single chunk. The constant term is the chunk itself.
///
/// Coefficients are wiped when the polynomial is dropped.
pub struct Polynomial {
    coeffs: Zeroizing<Vec<u32>>,
}

impl Polynomial {
    /// Samples a polynomial of degree `threshold - 1` with `secret` as its constant term.
    pub fn random<R: RngCore + CryptoRng>(
        field: &Field,
        secret: u32,
        threshold: u32,
        rng: &mut R,
    ) -> Self {
        let mut coeffs = Zeroizing::new(Vec::with_capacity(threshold as usize));
        coeffs.push(secret);
        coeffs.extend((1..threshold).map(|_| field.random(rng)));
        Self { coeffs }
    }

    pub fn eval(&self, field: &Field, x: u32) -> Result<u32> {
        evaluate(field, x, &self.coeffs)
    }

    /// Number of coefficients, i.e. the threshold.
    pub fn size(&self) -> usize {
        self.coeffs.len()
    }
}

/// Splits field elements into shares with a fixed access structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dealer {
    threshold: u32,
    num_shares: u32,
}

impl Dealer {
    /// Checks `2 <= threshold <= num_shares <= order`.
    pub fn new(field: &Field, threshold: u32, num_shares: u32) -> Result<Self> {
        let max = field.order();
        if num_shares < 2 || num_shares > max {
            return Err(Error::ShareCountOutOfRange { num_shares, max });
        }
        if threshold < 2 || threshold > num_shares {
            return Err(Error::InvalidThreshold {
                threshold,
                num_shares,
            });
        }

        Ok(Self {
            threshold,
            num_shares,
        })
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn num_shares(&self) -> u32 {
        self.num_shares
    }

    /// Shares one field element, evaluating a fresh random polynomial at `x = 1..=num_shares`.
    pub fn make_shares<R: RngCore + CryptoRng>(
        &self,
        field: &Field,
        secret: u32,
        rng: &mut R,
    ) -> Result<Vec<Point>> {
        let poly = Polynomial::random(field, secret, self.threshold, rng);
        (1..=self.num_shares)
            .map(|x| Ok(Point::new(x, poly.eval(field, x)?)))
            .collect()
    }

    /// Shares every chunk independently. The result is indexed by share, then by chunk, so
    /// `result[j][i]` is the point of share `j + 1` for chunk `i`.
    pub fn split<R: RngCore + CryptoRng>(
        &self,
        field: &Field,
        chunks: &[u32],
        rng: &mut R,
    ) -> Result<Vec<Vec<Point>>> {
        trace!(
            "sharing {} chunks over GF(2^{}), {} of {}",
            chunks.len(),
            field.bits(),
            self.threshold,
            self.num_shares
        );

        let mut shares = vec![Vec::with_capacity(chunks.len()); self.num_shares as usize];
        for &chunk in chunks {
            for (share, point) in shares.iter_mut().zip(self.make_shares(field, chunk, rng)?) {
                share.push(point);
            }
        }
        Ok(shares)
    }
}

/// Evaluates every chunk's polynomial at `at` from the given shares.
///
/// `xs[j]` is the index of share `j` and `ys[j]` its chunk values, least significant first.
/// Shares with fewer chunks are extended with zeros. Use `at = 0` to recover the secret.
pub fn reconstruct(field: &Field, at: u32, xs: &[u32], ys: &[Vec<u32>]) -> Result<Vec<u32>> {
    if xs.len() != ys.len() {
        return Err(Error::PointCountMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(Error::InsufficientShares(xs.len()));
    }

    let num_chunks = ys.iter().map(Vec::len).max().unwrap_or_default();
    trace!(
        "reconstructing {} chunks from {} shares over GF(2^{})",
        num_chunks,
        xs.len(),
        field.bits()
    );

    (0..num_chunks)
        .map(|i| {
            let column: Vec<u32> = ys
                .iter()
                .map(|chunks| chunks.get(i).copied().unwrap_or_default())
                .collect();
            interpolate(field, at, xs, &column)
        })
        .collect()
}
