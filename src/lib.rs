//! Shamir secret sharing over GF(2^n).
//!
//! A secret is split into `n` shares such that any `k` of them recover it and fewer reveal
//! nothing about it. Secrets longer than one field element are cut into chunks, each shared
//! with its own random polynomial, and every share carries one point per chunk.
//!
//! ```no_run
//! let shares = sss::split("correct horse", 5, 3)?;
//! assert_eq!(sss::combine(&shares[1..4])?, "correct horse");
//! # Ok::<(), sss::Error>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod math;
pub mod protocol;
pub mod secrets;
pub mod sharing;

use rand::rngs::OsRng;

pub use config::Settings;
pub use error::{Error, ErrorKind, Result};
pub use math::galois::Field;
pub use protocol::ShareString;
pub use secrets::Secrets;

/// Splits `secret` into `num_shares` shares over GF(2^8), any `threshold` of which recover it.
pub fn split(secret: &str, num_shares: u32, threshold: u32) -> Result<Vec<String>> {
    Secrets::new(Settings::default())?.share_text(secret, num_shares, threshold, &mut OsRng)
}

/// Recovers a secret produced by [`split`].
///
/// Passing fewer shares than the threshold used for splitting gives a wrong secret, or an error
/// if the wrong secret does not decode.
pub fn combine<S: AsRef<str>>(shares: &[S]) -> Result<String> {
    Secrets::new(Settings::default())?.combine_text(shares)
}
