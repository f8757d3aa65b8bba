use super::*;
mod codec;

use alloc::vec;
use alloc::vec::Vec;
use crate::atsaml21g18b;

fn saml21() -> (MemoryMap, DeviceBounds) {
    (atsaml21g18b::memory_map(), DeviceBounds::atsaml21g18b())
}

fn region(name: &str, origin: u32, length: u32) -> MemoryRegion {
    MemoryRegion::new(name, origin, length)
}
