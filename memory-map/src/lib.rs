#![no_std]

extern crate alloc;

pub mod atsaml21g18b;
pub mod device;
pub mod errors;
pub mod map;
pub mod memory;
pub mod parse;
pub mod region;
pub mod render;
pub mod size;
pub mod usage;

pub use device::{AddressWindow, DeviceBounds};
pub use errors::{DeviceLimit, MemoryMapError};
pub use map::MemoryMap;
pub use parse::{parse, ParseError, ParseErrorKind};
pub use region::MemoryRegion;
pub use render::render;
pub use usage::{RegionUsage, Usage};
