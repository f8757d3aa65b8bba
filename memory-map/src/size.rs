//! Numeric literals as they appear in linker scripts.

use alloc::format;
use alloc::string::String;

use crate::memory::{KIB, MIB};

/// Parses one ld integer literal: decimal, `0x`/`0X` hex or leading-zero
/// octal, optionally followed by a `K`/`k` or `M`/`m` multiplier.
///
/// Returns `None` for malformed input or if the value does not fit in a u64.
pub fn parse_number(literal: &str) -> Option<u64> {
    let (digits, multiplier) = match literal.as_bytes().last()? {
        b'K' | b'k' => (&literal[..literal.len() - 1], KIB as u64),
        b'M' | b'm' => (&literal[..literal.len() - 1], MIB as u64),
        _ => (literal, 1),
    };

    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        if hex.is_empty() {
            return None;
        }
        u64::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        u64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u64>().ok()?
    };

    value.checked_mul(multiplier)
}

/// Writes a length with the largest unit that divides it exactly.
pub fn format_length(length: u32) -> String {
    if length != 0 && length % MIB == 0 {
        format!("{}M", length / MIB)
    } else if length != 0 && length % KIB == 0 {
        format!("{}K", length / KIB)
    } else {
        format!("{}", length)
    }
}

pub fn format_address(address: u32) -> String {
    format!("{:#010x}", address)
}
