//! Per-region byte accounting for sections assigned to a map.

use alloc::string::String;
use alloc::vec::Vec;

use crate::errors::MemoryMapError;
use crate::map::MemoryMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionUsage {
    pub name: String,
    pub origin: u32,
    pub length: u32,
    pub used: u64,
}

impl RegionUsage {
    pub fn free(&self) -> u64 {
        (self.length as u64).saturating_sub(self.used)
    }

    pub fn percent_used(&self) -> f32 {
        if self.length == 0 {
            return 0.0;
        }
        self.used as f32 * 100.0 / self.length as f32
    }
}

pub struct Usage<'a> {
    map: &'a MemoryMap,
    used: Vec<u64>,
}

impl<'a> Usage<'a> {
    pub fn new(map: &'a MemoryMap) -> Self {
        Usage { map, used: alloc::vec![0; map.len()] }
    }

    /// Adds `size` bytes to the region called `region`.
    pub fn charge(&mut self, region: &str, size: u64) -> Result<(), MemoryMapError> {
        let index = self
            .map
            .iter()
            .position(|r| r.name == region)
            .ok_or_else(|| MemoryMapError::UnknownRegion { name: region.into() })?;
        self.charge_index(index, size)
    }

    /// Adds `size` bytes to whichever region holds `[address, address + size)`.
    pub fn charge_at(&mut self, section: &str, address: u64, size: u64) -> Result<(), MemoryMapError> {
        let index = self
            .map
            .position_enclosing(address, size)
            .ok_or_else(|| MemoryMapError::UnmappedSection {
                section: section.into(),
                address,
                size,
            })?;
        self.charge_index(index, size)
    }

    fn charge_index(&mut self, index: usize, size: u64) -> Result<(), MemoryMapError> {
        let region = &self.map.regions()[index];
        let requested = self.used[index].saturating_add(size);
        if requested > region.length as u64 {
            return Err(MemoryMapError::CapacityExceeded {
                region: region.name.clone(),
                requested,
                available: region.length as u64,
            });
        }
        self.used[index] = requested;
        Ok(())
    }

    pub fn used(&self, region: &str) -> Option<u64> {
        let index = self.map.iter().position(|r| r.name == region)?;
        Some(self.used[index])
    }

    pub fn report(&self) -> Vec<RegionUsage> {
        self.map
            .iter()
            .zip(&self.used)
            .map(|(region, &used)| RegionUsage {
                name: region.name.clone(),
                origin: region.origin,
                length: region.length,
                used,
            })
            .collect()
    }
}
