use alloc::string::String;
use core::fmt;
use core::ops::Range;

use crate::parse::ParseError;

/// The device limit a region crossed.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceLimit {
    /// `origin + length` runs past the end of the 32-bit address space.
    AddressWidth,
    /// The origin is not backed by any physical memory of the device.
    Unmapped { origin: u32 },
    /// The region starts inside `window` but runs past its end.
    WindowEnd { window: String, end: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemoryMapError {
    UnknownRegion {
        name: String,
    },
    Overlap {
        first: String,
        second: String,
        range: Range<u64>,
    },
    OutOfBounds {
        region: String,
        limit: DeviceLimit,
    },
    CapacityExceeded {
        region: String,
        requested: u64,
        available: u64,
    },
    EmptyRegion {
        name: String,
    },
    DuplicateRegion {
        name: String,
    },
    UnmappedSection {
        section: String,
        address: u64,
        size: u64,
    },
    Parse(ParseError),
}

impl From<ParseError> for MemoryMapError {
    fn from(err: ParseError) -> Self {
        MemoryMapError::Parse(err)
    }
}

impl fmt::Display for DeviceLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceLimit::AddressWidth => write!(f, "end of the 32-bit address space"),
            DeviceLimit::Unmapped { origin } => {
                write!(f, "origin {:#010x} is not backed by device memory", origin)
            }
            DeviceLimit::WindowEnd { window, end } => {
                write!(f, "end of {} at {:#010x}", window, end)
            }
        }
    }
}

impl fmt::Display for MemoryMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryMapError::UnknownRegion { name } => {
                write!(f, "region `{}` is not declared", name)
            }
            MemoryMapError::Overlap { first, second, range } => write!(
                f,
                "regions `{}` and `{}` overlap at [{:#010x}, {:#010x})",
                first, second, range.start, range.end
            ),
            MemoryMapError::OutOfBounds { region, limit } => {
                write!(f, "region `{}` exceeds the device: {}", region, limit)
            }
            MemoryMapError::CapacityExceeded { region, requested, available } => write!(
                f,
                "region `{}` overflowed: {} bytes requested, {} bytes available",
                region, requested, available
            ),
            MemoryMapError::EmptyRegion { name } => {
                write!(f, "region `{}` has zero length", name)
            }
            MemoryMapError::DuplicateRegion { name } => {
                write!(f, "region `{}` is declared more than once", name)
            }
            MemoryMapError::UnmappedSection { section, address, size } => write!(
                f,
                "`{}` ({} bytes at {:#010x}) does not fit in any region",
                section, size, address
            ),
            MemoryMapError::Parse(err) => write!(f, "{}", err),
        }
    }
}

impl core::error::Error for MemoryMapError {}
