//! Conversions between text, bytes, hex and bit-strings.
//!
//! Bit-strings are `String`s of `'0'` and `'1'`, most significant bit first. Hex output is always
//! lowercase.

use rustc_hex::ToHex;

use crate::error::{Error, Result};

/// Largest multiple a bit-string may be padded to.
pub const MAX_PADDING: usize = 1024;

pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.to_hex()
}

/// Parses pairs of hex digits into bytes. An odd leading digit stands alone.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>> {
    bits_to_bytes(&hex_to_bits(hex)?)
}

pub fn text_to_hex(text: &str) -> String {
    bytes_to_hex(text.as_bytes())
}

pub fn hex_to_text(hex: &str) -> Result<String> {
    Ok(String::from_utf8(hex_to_bytes(hex)?)?)
}

/// Eight bits per UTF-8 byte.
pub fn text_to_bits(text: &str) -> String {
    text.bytes().map(|b| format!("{b:08b}")).collect()
}

pub fn bits_to_text(bits: &str) -> Result<String> {
    Ok(String::from_utf8(bits_to_bytes(bits)?)?)
}

/// Pads to whole bytes first.
pub fn bits_to_bytes(bits: &str) -> Result<Vec<u8>> {
    let bits = pad_left(bits, 8)?;
    bits.as_bytes()
        .chunks(8)
        .map(|chunk| parse_bits(chunk).map(|b| b as u8))
        .collect()
}

/// Four bits per hex digit.
pub fn hex_to_bits(hex: &str) -> Result<String> {
    hex.chars()
        .map(|c| {
            c.to_digit(16)
                .map(|d| format!("{d:04b}"))
                .ok_or(Error::InvalidHex(c))
        })
        .collect()
}

/// Pads to a whole number of hex digits first.
pub fn bits_to_hex(bits: &str) -> Result<String> {
    let bits = pad_left(bits, 4)?;
    bits.as_bytes()
        .chunks(4)
        .map(|nibble| parse_bits(nibble).map(|d| format!("{d:x}")))
        .collect()
}

/// Left-pads `bits` with zeros to a multiple of `multiple` bits.
///
/// Multiples of 0 and 1 leave the string as is.
pub fn pad_left(bits: &str, multiple: usize) -> Result<String> {
    if multiple > MAX_PADDING {
        return Err(Error::PaddingTooLarge {
            multiple,
            max: MAX_PADDING,
        });
    }
    if multiple <= 1 {
        return Ok(bits.to_owned());
    }

    let missing = bits.len() % multiple;
    if missing == 0 {
        return Ok(bits.to_owned());
    }
    Ok(format!("{}{bits}", "0".repeat(multiple - missing)))
}

/// Splits `bits` into `chunk_bits`-wide values starting from the least significant end.
///
/// The first element is the least significant chunk. The most significant chunk may be shorter
/// than `chunk_bits`. When `pad_length` is set the string is padded first.
pub fn split_bits(bits: &str, chunk_bits: usize, pad_length: Option<usize>) -> Result<Vec<u32>> {
    debug_assert!(chunk_bits > 0 && chunk_bits <= 32);

    let bits = match pad_length {
        Some(multiple) => pad_left(bits, multiple)?,
        None => bits.to_owned(),
    };

    let bytes = bits.as_bytes();
    let mut parts = Vec::with_capacity(bytes.len() / chunk_bits + 1);
    let mut end = bytes.len();
    while end > chunk_bits {
        parts.push(parse_bits(&bytes[end - chunk_bits..end])?);
        end -= chunk_bits;
    }
    if end > 0 {
        parts.push(parse_bits(&bytes[..end])?);
    }
    Ok(parts)
}

/// Inverse of [`split_bits`]: each chunk becomes `chunk_bits` bits, the first chunk last.
pub fn join_chunks(chunks: &[u32], chunk_bits: usize) -> String {
    chunks
        .iter()
        .rev()
        .map(|c| format!("{c:0chunk_bits$b}"))
        .collect()
}

/// Formats `value` in `radix` (2..=36), lowercase.
pub fn to_radix(mut value: u32, radix: u32) -> Result<String> {
    if !(2..=36).contains(&radix) {
        return Err(Error::UnsupportedRadix(radix));
    }
    let mut digits = Vec::new();
    loop {
        let digit = char::from_digit(value % radix, radix).ok_or(Error::UnsupportedRadix(radix))?;
        digits.push(digit);
        value /= radix;
        if value == 0 {
            break;
        }
    }
    Ok(digits.iter().rev().collect())
}

fn parse_bits(bits: &[u8]) -> Result<u32> {
    bits.iter().try_fold(0u32, |acc, &b| match b {
        b'0' => Ok(acc << 1),
        b'1' => Ok((acc << 1) | 1),
        other => Err(Error::InvalidBinary(other as char)),
    })
}
