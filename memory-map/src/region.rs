use alloc::string::String;
use core::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Characters GNU ld accepts inside a region's `(attributes)`.
pub const ATTRIBUTE_CHARS: &[char] = &['r', 'w', 'x', 'a', 'i', 'l', 'R', 'W', 'X', 'A', 'I', 'L', '!'];

/// A named, contiguous range of device memory sections may be placed in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemoryRegion {
    pub name: String,
    pub origin: u32,
    pub length: u32,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub attributes: Option<String>,
}

impl MemoryRegion {
    pub fn new(name: &str, origin: u32, length: u32) -> Self {
        MemoryRegion {
            name: name.into(),
            origin,
            length,
            attributes: None,
        }
    }

    pub fn with_attributes(mut self, attributes: &str) -> Self {
        self.attributes = Some(attributes.into());
        self
    }

    /// First address past the region. Computed in 64 bits so a region
    /// touching the top of the address space does not wrap.
    #[inline(always)]
    pub fn end(&self) -> u64 {
        self.origin as u64 + self.length as u64
    }

    #[inline(always)]
    pub fn range(&self) -> Range<u64> {
        self.origin as u64..self.end()
    }

    #[inline(always)]
    pub fn contains(&self, addr: u64) -> bool {
        self.range().contains(&addr)
    }

    /// True if `[addr, addr + size)` lies entirely inside the region.
    pub fn encloses(&self, addr: u64, size: u64) -> bool {
        match addr.checked_add(size) {
            Some(end) => addr >= self.origin as u64 && end <= self.end(),
            None => false,
        }
    }

    /// The shared byte range, if any.
    pub fn overlap(&self, other: &MemoryRegion) -> Option<Range<u64>> {
        let start = self.origin.max(other.origin) as u64;
        let end = self.end().min(other.end());
        if start < end {
            Some(start..end)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_does_not_wrap() {
        let top = MemoryRegion::new("TOP", 0xFFFF_F000, 0x1000);
        assert_eq!(top.end(), 1 << 32);
        assert!(top.contains(0xFFFF_FFFF));
        assert!(!top.contains(1 << 32));
    }

    #[test]
    fn test_overlap() {
        let ram = MemoryRegion::new("RAM", 0x2000_0000, 32 * 1024);
        let extra = MemoryRegion::new("EXTRA", 0x2000_7000, 8 * 1024);
        assert_eq!(ram.overlap(&extra), Some(0x2000_7000..0x2000_8000));
        assert_eq!(extra.overlap(&ram), Some(0x2000_7000..0x2000_8000));

        // adjacent regions share no byte
        let next = MemoryRegion::new("NEXT", 0x2000_8000, 1024);
        assert_eq!(ram.overlap(&next), None);
        assert_eq!(next.overlap(&ram), None);
    }

    #[test]
    fn test_encloses() {
        let flash = MemoryRegion::new("FLASH", 0, 256 * 1024);
        assert!(flash.encloses(0, 256 * 1024));
        assert!(flash.encloses(0x100, 0x200));
        assert!(!flash.encloses(0x3_FFFF, 2));
        assert!(!flash.encloses(u64::MAX, 2));
    }

    #[test]
    fn test_attributes() {
        let flash = MemoryRegion::new("FLASH", 0, 1024).with_attributes("rx");
        assert_eq!(flash.attributes.as_deref(), Some("rx"));
        assert_eq!(MemoryRegion::new("RAM", 0, 1).attributes, None);
    }
}
