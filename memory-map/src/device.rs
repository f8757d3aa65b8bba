//! Physical memory windows of a device.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::DeviceLimit;
use crate::memory::*;
use crate::region::MemoryRegion;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AddressWindow {
    pub name: String,
    pub start: u32,
    /// 64 bits wide so one window can cover the whole 32-bit address space.
    pub size: u64,
}

impl AddressWindow {
    pub fn new(name: &str, start: u32, size: u64) -> Self {
        AddressWindow { name: name.into(), start, size }
    }

    #[inline(always)]
    pub fn end(&self) -> u64 {
        (self.start as u64).saturating_add(self.size)
    }

    #[inline(always)]
    pub fn contains(&self, addr: u64) -> bool {
        (self.start as u64..self.end()).contains(&addr)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceBounds {
    pub name: String,
    pub windows: Vec<AddressWindow>,
}

impl DeviceBounds {
    pub fn atsaml21g18b() -> Self {
        DeviceBounds {
            name: "ATSAML21G18B".into(),
            windows: vec![
                AddressWindow::new("FLASH", FLASH_START, FLASH_SIZE as u64),
                AddressWindow::new("RWW", RWW_START, RWW_SIZE as u64),
                AddressWindow::new("SRAM", SRAM_START, SRAM_SIZE as u64),
                AddressWindow::new("LPRAM", LPRAM_START, LPRAM_SIZE as u64),
            ],
        }
    }

    /// Bounds for a device without a known layout: the whole 32-bit space.
    pub fn unbounded() -> Self {
        DeviceBounds {
            name: "any".into(),
            windows: vec![AddressWindow::new("ADDRESS_SPACE", 0, ADDRESS_SPACE_END)],
        }
    }

    pub fn window_at(&self, addr: u32) -> Option<&AddressWindow> {
        self.windows.iter().find(|w| w.contains(addr as u64))
    }

    /// Checks that the whole region sits inside a single window.
    ///
    /// Windows may overlap; any one that holds the region will do. A region
    /// straddling two windows is rejected even when they are adjacent, so
    /// banks that a linker may treat as one must be described as one window.
    pub fn check(&self, region: &MemoryRegion) -> Result<(), DeviceLimit> {
        if region.end() > ADDRESS_SPACE_END {
            return Err(DeviceLimit::AddressWidth);
        }
        let origin = region.origin as u64;
        let mut furthest: Option<&AddressWindow> = None;
        for window in self.windows.iter().filter(|w| w.contains(origin)) {
            if region.end() <= window.end() {
                return Ok(());
            }
            if furthest.map_or(true, |f| window.end() > f.end()) {
                furthest = Some(window);
            }
        }
        match furthest {
            Some(window) => Err(DeviceLimit::WindowEnd {
                window: window.name.clone(),
                end: window.end(),
            }),
            None => Err(DeviceLimit::Unmapped { origin: region.origin }),
        }
    }
}

impl Default for DeviceBounds {
    fn default() -> Self {
        Self::atsaml21g18b()
    }
}
