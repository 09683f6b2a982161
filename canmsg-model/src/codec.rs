//! Numeric codec for points
//!
//! Pure functions that interpret and emit the raw bit pattern of a point
//! given its size, signedness, endianness and scaling format. `decode` and
//! `encode` are mutually inverse up to the precision of the declared
//! `format` (a `divideN` scale round-trips exactly for multiples of 1/N).
//!
//! `raw` values are the wire bit pattern read most-significant byte first;
//! the point's `endianness` says how to assemble the numeric value from
//! those bytes. A multi-byte point without a declared endianness cannot be
//! decoded - there is no silent default.

use crate::types::{CanPoint, Endianness, ModelError, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Decode a raw bit pattern into the point's physical value
///
/// # Errors
/// * `Range` if `raw` does not fit within `point.size` bits
/// * `Config` for an undecodable point (missing endianness on a
///   multi-byte lane, unknown `format`, `ieee754_f32` on a non-32-bit
///   point, unsupported bit width)
pub fn decode(raw: u64, point: &CanPoint) -> Result<f64> {
    check_width(point)?;
    if point.size < 64 && (raw >> point.size) != 0 {
        return Err(ModelError::Range(format!(
            "raw value {:#x} wider than {} bits",
            raw, point.size
        )));
    }

    let native = lane_to_native(raw, point)?;

    if point.is_float() {
        return Ok(f64::from(f32::from_bits(native as u32)));
    }

    let integer = if point.is_signed() {
        sign_extend(native, point.size as usize) as f64
    } else {
        native as f64
    };

    Ok(integer / scale_divisor(point)?)
}

/// Encode a physical value into the point's raw bit pattern
///
/// # Errors
/// * `Range` if the scaled value does not fit the point's signed or
///   unsigned range
/// * `Config` under the same conditions as [`decode`]
pub fn encode(value: f64, point: &CanPoint) -> Result<u64> {
    check_width(point)?;

    if point.is_float() {
        // size == 32 is enforced by check_width for float points
        let bits = u64::from((value as f32).to_bits());
        return native_to_lane(bits, point);
    }

    let scaled = (value * scale_divisor(point)?).round();
    let native = if point.is_signed() {
        let min = -(2f64.powi(point.size as i32 - 1));
        let max = 2f64.powi(point.size as i32 - 1) - 1.0;
        if scaled < min || scaled > max {
            return Err(ModelError::Range(format!(
                "{} outside signed {}-bit range [{}, {}]",
                scaled, point.size, min, max
            )));
        }
        (scaled as i64 as u64) & width_mask(point.size)
    } else {
        let max = 2f64.powi(point.size as i32) - 1.0;
        if scaled < 0.0 || scaled > max {
            return Err(ModelError::Range(format!(
                "{} outside unsigned {}-bit range [0, {}]",
                scaled, point.size, max
            )));
        }
        scaled as u64
    };

    native_to_lane(native, point)
}

/// Validate the width-related invariants shared by decode and encode
fn check_width(point: &CanPoint) -> Result<()> {
    if point.size == 0 || point.size > 64 {
        return Err(ModelError::Config(format!(
            "unsupported point size {} (expected 1-64 bits)",
            point.size
        )));
    }
    if point.is_float() && point.size != 32 {
        return Err(ModelError::Config(format!(
            "ieee754_f32 requires a 32-bit point, got {} bits",
            point.size
        )));
    }
    if point.size > 8 && point.size % 8 != 0 {
        return Err(ModelError::Config(format!(
            "multi-byte point size {} is not byte-aligned",
            point.size
        )));
    }
    Ok(())
}

/// Assemble the numeric value from the wire-order bytes of `raw`
fn lane_to_native(raw: u64, point: &CanPoint) -> Result<u64> {
    if point.size <= 8 {
        // Single byte: byte order is irrelevant
        return Ok(raw);
    }
    let n = (point.size / 8) as usize;
    let bytes = raw.to_be_bytes();
    let lane = &bytes[8 - n..];
    match required_endianness(point)? {
        Endianness::Big => Ok(BigEndian::read_uint(lane, n)),
        Endianness::Little => Ok(LittleEndian::read_uint(lane, n)),
    }
}

/// Lay the numeric value out in wire byte order, inverse of `lane_to_native`
fn native_to_lane(native: u64, point: &CanPoint) -> Result<u64> {
    if point.size <= 8 {
        return Ok(native);
    }
    let n = (point.size / 8) as usize;
    let mut lane = [0u8; 8];
    match required_endianness(point)? {
        Endianness::Big => BigEndian::write_uint(&mut lane[..n], native, n),
        Endianness::Little => LittleEndian::write_uint(&mut lane[..n], native, n),
    }
    Ok(BigEndian::read_uint(&lane[..n], n))
}

fn required_endianness(point: &CanPoint) -> Result<Endianness> {
    point.endianness.ok_or_else(|| {
        ModelError::Config(format!(
            "{}-bit point spans multiple bytes but declares no endianness",
            point.size
        ))
    })
}

/// Divisor implied by the point's `format` (identity when absent).
///
/// The only observed shape is `divideN`: raw integer / N yields the
/// physical value.
fn scale_divisor(point: &CanPoint) -> Result<f64> {
    let Some(format) = point.format.as_deref() else {
        return Ok(1.0);
    };
    let divisor = format
        .strip_prefix("divide")
        .and_then(|n| n.parse::<u32>().ok())
        .filter(|n| *n > 0);
    match divisor {
        Some(n) => Ok(f64::from(n)),
        None => Err(ModelError::Config(format!(
            "unknown point format '{}'",
            format
        ))),
    }
}

/// Sign-extend a value from N bits to 64 bits
///
/// If the value's MSB is 1, fill the upper bits with 1s.
fn sign_extend(value: u64, bit_length: usize) -> i64 {
    if bit_length >= 64 {
        return value as i64;
    }
    let sign_bit = 1u64 << (bit_length - 1);
    if (value & sign_bit) != 0 {
        let mask = !0u64 << bit_length;
        (value | mask) as i64
    } else {
        value as i64
    }
}

fn width_mask(size: u32) -> u64 {
    if size >= 64 {
        u64::MAX
    } else {
        (1u64 << size) - 1
    }
}
