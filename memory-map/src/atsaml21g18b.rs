//! Memory map of the ATSAML21G18B: 256K flash, 32K SRAM.

use alloc::vec::Vec;

use crate::map::MemoryMap;
use crate::memory::KIB;
use crate::region::MemoryRegion;

/// The checked-in linker declaration, as handed to `cortex-m-rt`.
pub const MEMORY_X: &str = include_str!("../memory.x");

macro_rules! define_regions {
    (
        $( ($name:ident, $origin_const:ident, $length_const:ident, $origin:expr, $length:expr) ),*
        $(,)?
    ) => {
        $(
            pub const $origin_const: u32 = $origin;
            pub const $length_const: u32 = $length;
        )*

        /// `(name, origin, length)` for every region, in declaration order.
        pub const DECLARATIONS: &[(&str, u32, u32)] = &[
            $( (stringify!($name), $origin, $length), )*
        ];
    }
}

define_regions!(
    (FLASH, FLASH_ORIGIN, FLASH_LENGTH, 0x0000_0000u32, 256 * KIB),
    (RAM, RAM_ORIGIN, RAM_LENGTH, 0x2000_0000u32, 32 * KIB),
);

pub fn memory_map() -> MemoryMap {
    MemoryMap::from_regions(
        DECLARATIONS
            .iter()
            .map(|&(name, origin, length)| MemoryRegion::new(name, origin, length))
            .collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_constants() {
        assert_eq!(FLASH_ORIGIN, 0x0000_0000);
        assert_eq!(FLASH_LENGTH, 262_144);
        assert_eq!(RAM_ORIGIN, 0x2000_0000);
        assert_eq!(RAM_LENGTH, 32_768);
    }

    #[test]
    fn test_declaration_order() {
        let names: Vec<_> = DECLARATIONS.iter().map(|d| d.0).collect();
        assert_eq!(names, ["FLASH", "RAM"]);
    }

    #[test]
    fn test_memory_x_matches_declarations() {
        let parsed: MemoryMap = MEMORY_X.parse().unwrap();
        assert!(parsed.is_equivalent(&memory_map()));
    }
}
