pub mod galois;
use galois::Field;

use crate::error::{Error, Result};

/// Evaluates `coeffs[0] + coeffs[1] x + ... + coeffs[n-1] x^(n-1)` at `x` using Horner's method.
///
/// While the accumulator is zero the multiplication is skipped, zero has no logarithm. Fails if
/// `x` or a coefficient is not an element of the field.
pub fn evaluate(field: &Field, x: u32, coeffs: &[u32]) -> Result<u32> {
    check_element(field, x)?;
    coeffs.iter().rev().try_fold(0, |fx, &c| {
        check_element(field, c)?;
        if fx == 0 {
            return Ok(c);
        }
        let product = field.mul(fx, x).ok_or(Error::NotAnElement {
            value: fx,
            max: field.order(),
        })?;
        Ok(field.add(product, c))
    })
}

/// Contribution of one sample to a Lagrange sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Term {
    /// Log of the non-zero term.
    Log(u32),
    /// The basis polynomial is zero at the evaluation point.
    Vanishes,
}

/// Evaluates at `at` the polynomial passing through the points `(xs[i], ys[i])`.
///
/// Every `xs[i]` must be a distinct non-zero element, `at` and every `ys[i]` any element. With
/// fewer points than the degree of the sharing polynomial plus one the result is simply wrong,
/// there is no way to tell from here.
pub fn interpolate(field: &Field, at: u32, xs: &[u32], ys: &[u32]) -> Result<u32> {
    check_points(field, at, xs, ys)?;

    let order = field.order();
    let mut sum = 0;

    for (i, (&xi, &yi)) in xs.iter().zip(ys).enumerate() {
        // Zero terms contribute nothing and have no logarithm.
        let Some(log_y) = field.log(yi) else {
            continue;
        };

        let mut term = Term::Log(log_y);
        for (j, &xj) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            if at == xj {
                term = Term::Vanishes;
                break;
            }
            if let Term::Log(product) = term {
                let num = field
                    .log(at ^ xj)
                    .ok_or(Error::NotAnElement { value: at, max: order })?;
                let den = field.log(xi ^ xj).ok_or(Error::DuplicateShare(xj))?;
                term = Term::Log((product + num + order - den) % order);
            }
        }

        if let Term::Log(product) = term {
            sum = field.add(sum, field.exp(product));
        }
    }

    Ok(sum)
}

fn check_element(field: &Field, value: u32) -> Result<()> {
    if field.contains(value) {
        Ok(())
    } else {
        Err(Error::NotAnElement {
            value,
            max: field.order(),
        })
    }
}

// The xs must not repeat and must be non-zero, otherwise the log of zero would be needed.
fn check_points(field: &Field, at: u32, xs: &[u32], ys: &[u32]) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(Error::PointCountMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }

    let max = field.order();
    if let Some(&id) = xs.iter().find(|&&x| x == 0 || x > max) {
        return Err(Error::ShareIdOutOfRange { id, max });
    }
    check_element(field, at)?;
    for &y in ys {
        check_element(field, y)?;
    }

    let mut sorted = xs.to_vec();
    sorted.sort_unstable();
    match sorted.windows(2).find(|w| w[0] == w[1]) {
        Some(w) => Err(Error::DuplicateShare(w[0])),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_eval(field: &Field, x: u32, coeffs: &[u32]) -> u32 {
        let mut acc = 0;
        let mut pow = 1;
        for &c in coeffs {
            acc = field.add(acc, field.mul(c, pow).unwrap());
            pow = field.mul(pow, x).unwrap();
        }
        acc
    }

    #[test]
    fn horner_matches_naive_evaluation() {
        let field = Field::with_bits(8).unwrap();
        let coeffs = [97, 0, 13, 255, 1];
        for x in 1..=255 {
            assert_eq!(evaluate(&field, x, &coeffs), Ok(naive_eval(&field, x, &coeffs)));
        }
    }

    #[test]
    fn horner_edge_cases() {
        let field = Field::with_bits(8).unwrap();
        assert_eq!(evaluate(&field, 5, &[]), Ok(0));
        assert_eq!(evaluate(&field, 5, &[42]), Ok(42));
        assert_eq!(evaluate(&field, 5, &[0, 0, 0]), Ok(0));
        // 1 + x over GF(2^8)
        assert_eq!(evaluate(&field, 5, &[1, 1]), Ok(4));
    }

    #[test]
    fn evaluation_rejects_values_outside_the_field() {
        let field = Field::with_bits(8).unwrap();
        let not_an_element =
            |value: u32| -> Result<u32> { Err(Error::NotAnElement { value, max: 255 }) };
        assert_eq!(evaluate(&field, 300, &[1, 1]), not_an_element(300));
        assert_eq!(evaluate(&field, 256, &[]), not_an_element(256));
        assert_eq!(evaluate(&field, 5, &[1, 256, 3]), not_an_element(256));
        assert_eq!(evaluate(&field, 5, &[999]), not_an_element(999));
    }

    #[test]
    fn interpolation_recovers_constant_term() {
        let field = Field::with_bits(8).unwrap();
        let coeffs = [97, 200, 3];
        let xs = [2, 5, 9];
        let ys: Vec<_> = xs.iter().map(|&x| evaluate(&field, x, &coeffs).unwrap()).collect();
        assert_eq!(interpolate(&field, 0, &xs, &ys).unwrap(), 97);

        // Any other point on the polynomial too.
        for at in [1, 3, 100, 255] {
            assert_eq!(
                interpolate(&field, at, &xs, &ys),
                evaluate(&field, at, &coeffs)
            );
        }
    }

    #[test]
    fn interpolation_at_a_sample_returns_its_value() {
        let field = Field::with_bits(8).unwrap();
        let coeffs = [12, 34, 56];
        let xs = [1, 2, 3];
        let ys: Vec<_> = xs.iter().map(|&x| evaluate(&field, x, &coeffs).unwrap()).collect();
        for (&x, &y) in xs.iter().zip(&ys) {
            assert_eq!(interpolate(&field, x, &xs, &ys).unwrap(), y);
        }
    }

    #[test]
    fn interpolation_skips_zero_samples() {
        let field = Field::with_bits(8).unwrap();
        // Zero polynomial.
        assert_eq!(interpolate(&field, 0, &[1, 2, 3], &[0, 0, 0]).unwrap(), 0);
    }

    #[test]
    fn interpolation_rejects_bad_points() {
        let field = Field::with_bits(8).unwrap();
        assert_eq!(
            interpolate(&field, 0, &[1, 2, 1], &[5, 6, 7]),
            Err(Error::DuplicateShare(1))
        );
        assert!(interpolate(&field, 0, &[0, 2], &[5, 6]).is_err());
        assert_eq!(
            interpolate(&field, 0, &[1, 256], &[5, 6]),
            Err(Error::ShareIdOutOfRange { id: 256, max: 255 })
        );
    }

    #[test]
    fn interpolation_rejects_values_outside_the_field() {
        let field = Field::with_bits(8).unwrap();
        assert_eq!(
            interpolate(&field, 0, &[1, 2], &[300, 5]),
            Err(Error::NotAnElement { value: 300, max: 255 })
        );
        assert_eq!(
            interpolate(&field, 999, &[1, 2], &[7, 5]),
            Err(Error::NotAnElement { value: 999, max: 255 })
        );
        // The largest element is still accepted everywhere.
        assert!(interpolate(&field, 255, &[1, 255], &[255, 5]).is_ok());
    }

    #[test]
    fn interpolation_rejects_unpaired_samples() {
        let field = Field::with_bits(8).unwrap();
        assert_eq!(
            interpolate(&field, 0, &[1, 2, 3], &[5, 6]),
            Err(Error::PointCountMismatch { xs: 3, ys: 2 })
        );
        assert_eq!(
            interpolate(&field, 0, &[1], &[5, 6]),
            Err(Error::PointCountMismatch { xs: 1, ys: 2 })
        );
    }
}
