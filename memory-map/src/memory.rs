// 1K   = 0x0000_0400
// 8K   = 0x0000_2000
// 32K  = 0x0000_8000
// 64K  = 0x0001_0000
// 128K = 0x0002_0000
// 256K = 0x0004_0000
// 512K = 0x0008_0000
// 1M   = 0x0010_0000

// Linker scripts use binary units: K is 1024 bytes, M is 1024K. Never 1000.
pub const KIB: u32 = 1024;
pub const MIB: u32 = 1024 * KIB;

// The device address space is 32 bits wide.
pub const ADDRESS_SPACE_END: u64 = 1 << 32;

// ATSAML21G18B physical memories (SAM L21 datasheet, "Physical Memory Map")
pub const FLASH_START: u32 = 0x0000_0000;
pub const FLASH_SIZE: u32 = 256 * KIB; // 0x0004_0000

pub const RWW_START: u32 = 0x0040_0000;
pub const RWW_SIZE: u32 = 8 * KIB; // 0x0000_2000

pub const SRAM_START: u32 = 0x2000_0000;
pub const SRAM_SIZE: u32 = 32 * KIB; // 0x0000_8000

pub const LPRAM_START: u32 = 0x3000_0000;
pub const LPRAM_SIZE: u32 = 8 * KIB; // 0x0000_2000
