//! Bridge between fixed-width `R ‖ S` ECDSA signatures and DER
//!
//! JWS carries ECDSA signatures as two concatenated big-endian integers of
//! exactly `length` bytes each (32, 48 or 66). The curve primitives speak
//! `SEQUENCE { INTEGER r, INTEGER s }`. Both directions check every length
//! explicitly and never read past a declared boundary.

use crate::error::ConversionFailure;
use tracing::trace;

const ASN1_SEQUENCE: u8 = 0x30;
const ASN1_INTEGER: u8 = 0x02;
const ASN1_LENGTH_2BYTES: u8 = 0x81;
const ASN1_MAX_SINGLE_BYTE: usize = 0x7f;
const ASN1_NEGATIVE_INTEGER: u8 = 0x7f;
const BYTE_SIZE: usize = 2;

/// Convert a raw `R ‖ S` signature into a DER sequence
///
/// `length` is the width of one integer. `points` must be exactly twice that.
pub fn to_asn1(points: &[u8], length: usize) -> Result<Vec<u8>, ConversionFailure> {
    if length == 0 || points.len() != length * BYTE_SIZE {
        return Err(ConversionFailure::InvalidLength);
    }

    let (r, s) = points.split_at(length);
    let r = prepare_positive_integer(r);
    let s = prepare_positive_integer(s);

    let content_length = BYTE_SIZE * 2 + r.len() + s.len();
    if r.len() > ASN1_MAX_SINGLE_BYTE || s.len() > ASN1_MAX_SINGLE_BYTE || content_length > 0xff {
        return Err(ConversionFailure::InvalidLength);
    }

    let mut der = Vec::with_capacity(content_length + 3);
    der.push(ASN1_SEQUENCE);
    if content_length > ASN1_MAX_SINGLE_BYTE {
        der.push(ASN1_LENGTH_2BYTES);
    }
    der.push(content_length as u8);
    for integer in [&r, &s] {
        der.push(ASN1_INTEGER);
        der.push(integer.len() as u8);
        der.extend_from_slice(integer);
    }

    trace!(length, der_len = der.len(), "converted ECDSA point to DER");
    Ok(der)
}

/// Convert a DER sequence back into a raw `R ‖ S` signature of `2 * length` bytes
pub fn from_asn1(der: &[u8], length: usize) -> Result<Vec<u8>, ConversionFailure> {
    if der.first() != Some(&ASN1_SEQUENCE) {
        return Err(ConversionFailure::IncorrectStartSequence);
    }

    let (declared, mut position) = read_length(der, 1)?;
    if der.len() - position != declared {
        return Err(ConversionFailure::InvalidLength);
    }

    let (r, next) = read_integer(der, position)?;
    position = next;
    let (s, next) = read_integer(der, position)?;
    if next != der.len() {
        return Err(ConversionFailure::InvalidLength);
    }

    let mut points = Vec::with_capacity(length * BYTE_SIZE);
    points.extend_from_slice(&retrieve_positive_integer(r, length)?);
    points.extend_from_slice(&retrieve_positive_integer(s, length)?);

    trace!(length, der_len = der.len(), "converted DER to ECDSA point");
    Ok(points)
}

/// Minimal DER form of an unsigned big-endian integer
///
/// Leading zero bytes are dropped unless the next byte would then read as
/// negative; a zero byte is prepended when the high bit is set.
fn prepare_positive_integer(data: &[u8]) -> Vec<u8> {
    let mut start = 0;
    while start + 1 < data.len() && data[start] == 0 && data[start + 1] <= ASN1_NEGATIVE_INTEGER {
        start += 1;
    }
    let trimmed = &data[start..];

    let mut integer = Vec::with_capacity(trimmed.len() + 1);
    if trimmed.first().is_some_and(|first| *first > ASN1_NEGATIVE_INTEGER) {
        integer.push(0x00);
    }
    integer.extend_from_slice(trimmed);
    integer
}

/// Strip sign guards and left-pad to exactly `length` bytes
fn retrieve_positive_integer(data: &[u8], length: usize) -> Result<Vec<u8>, ConversionFailure> {
    let mut start = 0;
    while data.len() - start > length && data[start] == 0 {
        start += 1;
    }
    let digits = &data[start..];
    if digits.len() > length {
        return Err(ConversionFailure::InvalidLength);
    }

    let mut padded = vec![0u8; length - digits.len()];
    padded.extend_from_slice(digits);
    Ok(padded)
}

/// Short form, or `0x81` followed by one length byte above `0x7f`
///
/// The long form is only minimal DER when the short form cannot hold the
/// length, so `0x81 0x00..=0x7f` is rejected.
fn read_length(data: &[u8], offset: usize) -> Result<(usize, usize), ConversionFailure> {
    match data.get(offset) {
        Some(&first) if usize::from(first) <= ASN1_MAX_SINGLE_BYTE => {
            Ok((usize::from(first), offset + 1))
        }
        Some(&ASN1_LENGTH_2BYTES) => match data.get(offset + 1) {
            Some(&length) if usize::from(length) > ASN1_MAX_SINGLE_BYTE => {
                Ok((usize::from(length), offset + 2))
            }
            _ => Err(ConversionFailure::InvalidLength),
        },
        _ => Err(ConversionFailure::InvalidLength),
    }
}

fn read_integer(data: &[u8], offset: usize) -> Result<(&[u8], usize), ConversionFailure> {
    match data.get(offset) {
        Some(&ASN1_INTEGER) => {}
        Some(_) => return Err(ConversionFailure::IntegerExpected),
        None => return Err(ConversionFailure::InvalidLength),
    }

    let (length, start) = read_length(data, offset + 1)?;
    if length == 0 {
        return Err(ConversionFailure::InvalidLength);
    }
    let end = start + length;
    let value = data.get(start..end).ok_or(ConversionFailure::InvalidLength)?;
    Ok((value, end))
}
