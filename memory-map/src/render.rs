use alloc::string::{String, ToString};
use core::fmt;

use crate::map::MemoryMap;
use crate::size::{format_address, format_length};

/// Writes the map as a linker script `MEMORY` block.
impl fmt::Display for MemoryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MEMORY")?;
        writeln!(f, "{{")?;
        for region in self {
            write!(f, "  {}", region.name)?;
            if let Some(attributes) = &region.attributes {
                write!(f, " ({})", attributes)?;
            }
            writeln!(
                f,
                " : ORIGIN = {}, LENGTH = {}",
                format_address(region.origin),
                format_length(region.length)
            )?;
        }
        writeln!(f, "}}")
    }
}

pub fn render(map: &MemoryMap) -> String {
    map.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::MemoryRegion;

    #[test]
    fn test_render_layout() {
        let map = MemoryMap::new()
            .with_region(MemoryRegion::new("FLASH", 0x0, 256 * 1024).with_attributes("rx"))
            .with_region(MemoryRegion::new("RAM", 0x2000_0000, 32 * 1024))
            .with_region(MemoryRegion::new("ODD", 0x3000_0000, 100));

        assert_eq!(
            render(&map),
            "MEMORY\n\
             {\n  \
             FLASH (rx) : ORIGIN = 0x00000000, LENGTH = 256K\n  \
             RAM : ORIGIN = 0x20000000, LENGTH = 32K\n  \
             ODD : ORIGIN = 0x30000000, LENGTH = 100\n\
             }\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&MemoryMap::new()), "MEMORY\n{\n}\n");
    }
}
