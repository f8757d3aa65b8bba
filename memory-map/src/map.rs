#[cfg(test)]
mod tests;

use alloc::vec::Vec;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::device::DeviceBounds;
use crate::errors::MemoryMapError;
use crate::parse::{parse, ParseError};
use crate::region::MemoryRegion;

/// Named address ranges a linker may place sections into, in declaration order.
///
/// The map only bounds where placement is allowed; which section goes where
/// is decided by the linker script's `SECTIONS` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct MemoryMap {
    regions: Vec<MemoryRegion>,
}

impl MemoryMap {
    pub fn new() -> Self {
        MemoryMap { regions: Vec::new() }
    }

    pub fn from_regions(regions: Vec<MemoryRegion>) -> Self {
        MemoryMap { regions }
    }

    pub fn with_region(mut self, region: MemoryRegion) -> Self {
        self.push(region);
        self
    }

    pub fn push(&mut self, region: MemoryRegion) {
        self.regions.push(region);
    }

    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    pub fn iter(&self) -> core::slice::Iter<'_, MemoryRegion> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&MemoryRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Origin and length of the region called `name`.
    pub fn resolve(&self, name: &str) -> Result<(u32, u32), MemoryMapError> {
        self.get(name)
            .map(|r| (r.origin, r.length))
            .ok_or_else(|| MemoryMapError::UnknownRegion { name: name.into() })
    }

    /// Index of the first non-empty region holding all of `[addr, addr + size)`.
    pub fn position_enclosing(&self, addr: u64, size: u64) -> Option<usize> {
        self.regions.iter().position(|r| r.length > 0 && r.encloses(addr, size))
    }

    pub fn region_enclosing(&self, addr: u64, size: u64) -> Option<&MemoryRegion> {
        self.position_enclosing(addr, size).map(|i| &self.regions[i])
    }

    /// Every broken invariant. Empty and duplicate regions come first, then
    /// overlapping pairs, then regions the device cannot back, each group in
    /// declaration order.
    pub fn diagnose(&self, device: &DeviceBounds) -> Vec<MemoryMapError> {
        let mut errors = Vec::new();

        for (i, region) in self.regions.iter().enumerate() {
            if region.length == 0 {
                errors.push(MemoryMapError::EmptyRegion { name: region.name.clone() });
            }
            if self.regions[..i].iter().any(|r| r.name == region.name) {
                errors.push(MemoryMapError::DuplicateRegion { name: region.name.clone() });
            }
        }

        for (i, first) in self.regions.iter().enumerate() {
            for second in &self.regions[i + 1..] {
                if let Some(range) = first.overlap(second) {
                    errors.push(MemoryMapError::Overlap {
                        first: first.name.clone(),
                        second: second.name.clone(),
                        range,
                    });
                }
            }
        }

        for region in self.regions.iter().filter(|r| r.length > 0) {
            if let Err(limit) = device.check(region) {
                errors.push(MemoryMapError::OutOfBounds {
                    region: region.name.clone(),
                    limit,
                });
            }
        }

        errors
    }

    pub fn validate(&self, device: &DeviceBounds) -> Result<(), MemoryMapError> {
        match self.diagnose(device).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Same `(name, origin, length)` set, ignoring declaration order and attributes.
    pub fn is_equivalent(&self, other: &MemoryMap) -> bool {
        fn key(r: &MemoryRegion) -> (&str, u32, u32) {
            (r.name.as_str(), r.origin, r.length)
        }
        let mut ours: Vec<_> = self.regions.iter().map(key).collect();
        let mut theirs: Vec<_> = other.regions.iter().map(key).collect();
        ours.sort_unstable();
        theirs.sort_unstable();
        ours == theirs
    }
}

impl FromStr for MemoryMap {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl<'a> IntoIterator for &'a MemoryMap {
    type Item = &'a MemoryRegion;
    type IntoIter = core::slice::Iter<'a, MemoryRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
