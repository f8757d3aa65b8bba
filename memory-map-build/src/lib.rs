//! Build script support: validate a memory map and hand it to the linker as
//! `memory.x`.
//!
//! ```ignore
//! // build.rs
//! fn main() {
//!     memory_map_build::MemoryX::atsaml21g18b().write_to_out_dir().unwrap();
//!     println!("cargo:rustc-link-arg=-Tlink.x");
//! }
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use memory_map::*;

pub const FILE_NAME: &str = "memory.x";

#[derive(Debug)]
pub enum BuildError {
    Invalid(MemoryMapError),
    MissingOutDir,
    Io(io::Error),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Invalid(err) => write!(f, "invalid memory map: {}", err),
            BuildError::MissingOutDir => write!(f, "OUT_DIR is not set; run from a build script"),
            BuildError::Io(err) => write!(f, "writing {}: {}", FILE_NAME, err),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Invalid(err) => Some(err),
            BuildError::MissingOutDir => None,
            BuildError::Io(err) => Some(err),
        }
    }
}

impl From<MemoryMapError> for BuildError {
    fn from(err: MemoryMapError) -> Self {
        BuildError::Invalid(err)
    }
}

impl From<io::Error> for BuildError {
    fn from(err: io::Error) -> Self {
        BuildError::Io(err)
    }
}

pub struct MemoryX {
    map: MemoryMap,
    device: DeviceBounds,
}

impl MemoryX {
    pub fn new(map: MemoryMap) -> Self {
        MemoryX { map, device: DeviceBounds::default() }
    }

    pub fn atsaml21g18b() -> Self {
        Self::new(atsaml21g18b::memory_map())
    }

    pub fn device(mut self, device: DeviceBounds) -> Self {
        self.device = device;
        self
    }

    pub fn map(&self) -> &MemoryMap {
        &self.map
    }

    /// Validates the map and writes `memory.x` into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, BuildError> {
        self.map.validate(&self.device)?;
        let path = dir.join(FILE_NAME);
        fs::write(&path, render(&self.map))?;
        Ok(path)
    }

    /// Writes `memory.x` into cargo's `OUT_DIR` and puts it on the linker
    /// search path.
    pub fn write_to_out_dir(&self) -> Result<PathBuf, BuildError> {
        let out = std::env::var_os("OUT_DIR").ok_or(BuildError::MissingOutDir)?;
        let out_dir = PathBuf::from(out);
        let path = self.write_to(&out_dir)?;

        println!("cargo:rustc-link-search={}", out_dir.display());
        println!("cargo:rerun-if-changed=build.rs");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("memory-map-build-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_writes_valid_map() {
        let dir = scratch_dir("valid");
        let path = MemoryX::atsaml21g18b().write_to(&dir).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "MEMORY\n{\n  FLASH : ORIGIN = 0x00000000, LENGTH = 256K\n  RAM : ORIGIN = 0x20000000, LENGTH = 32K\n}\n"
        );
        let reparsed: MemoryMap = written.parse().unwrap();
        assert!(reparsed.is_equivalent(&atsaml21g18b::memory_map()));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_refuses_invalid_map() {
        let dir = scratch_dir("invalid");
        let map = atsaml21g18b::memory_map().with_region(MemoryRegion::new("EXTRA", 0x2000_7000, 8 * 1024));

        let err = MemoryX::new(map).write_to(&dir).unwrap_err();
        assert!(matches!(err, BuildError::Invalid(MemoryMapError::Overlap { .. })));
        assert!(!dir.join(FILE_NAME).exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_custom_device() {
        let dir = scratch_dir("device");
        let map = MemoryMap::new().with_region(MemoryRegion::new("RAM", 0x2000_0000, 64 * 1024));

        assert!(MemoryX::new(map.clone()).write_to(&dir).is_err());
        let device = DeviceBounds {
            name: "bigger".into(),
            windows: vec![AddressWindow::new("SRAM", 0x2000_0000, 64 * 1024)],
        };
        assert!(MemoryX::new(map).device(device).write_to(&dir).is_ok());

        fs::remove_dir_all(&dir).unwrap();
    }

    // The only test touching OUT_DIR, so it cannot race another one.
    #[test]
    fn test_write_to_out_dir() {
        std::env::remove_var("OUT_DIR");
        let err = MemoryX::atsaml21g18b().write_to_out_dir().unwrap_err();
        assert!(matches!(err, BuildError::MissingOutDir));

        let dir = scratch_dir("out_dir");
        std::env::set_var("OUT_DIR", &dir);
        let path = MemoryX::atsaml21g18b().write_to_out_dir().unwrap();
        std::env::remove_var("OUT_DIR");

        assert_eq!(path, dir.join(FILE_NAME));
        assert!(path.exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
