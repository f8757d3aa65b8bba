mod elf;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use memory_map::{atsaml21g18b, render, DeviceBounds, MemoryMap, Usage};

#[derive(Parser)]
#[command(name = "memmap", version, about = "Inspect and check linker memory maps")]
struct Cli {
    /// memory.x to use instead of the built-in ATSAML21G18B map
    #[arg(short, long, global = true)]
    memory: Option<PathBuf>,

    /// JSON device description with the valid address windows
    #[arg(short, long, global = true)]
    device: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the declared regions
    Show,
    /// Print origin and length of one region
    Resolve { name: String },
    /// Check the map against the device
    Validate,
    /// Write the map as memory.x
    Render {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that an ELF image fits the map
    Check { elf: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            process::exit(2);
        }
    }
}

fn load_map(cli: &Cli) -> Result<MemoryMap> {
    match &cli.memory {
        Some(path) => {
            if cli.verbose {
                eprintln!("reading {}", path.display());
            }
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            let map = text
                .parse::<MemoryMap>()
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(map)
        }
        None => Ok(atsaml21g18b::memory_map()),
    }
}

fn load_device(cli: &Cli) -> Result<DeviceBounds> {
    match &cli.device {
        Some(path) => {
            if cli.verbose {
                eprintln!("reading device description {}", path.display());
            }
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            let device = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
            Ok(device)
        }
        None => Ok(DeviceBounds::atsaml21g18b()),
    }
}

// Ok(false) means the command ran but found a problem with the map or image.
fn run(cli: &Cli) -> Result<bool> {
    let map = load_map(cli)?;

    match &cli.command {
        Command::Show => {
            println!("{:<12} {:>12} {:>12} {:>10}", "NAME", "ORIGIN", "END", "LENGTH");
            for region in &map {
                println!(
                    "{:<12} {:>#12x} {:>#12x} {:>10}",
                    region.name,
                    region.origin,
                    region.end(),
                    region.length
                );
            }
        }
        Command::Resolve { name } => match map.resolve(name) {
            Ok((origin, length)) => println!("{} {:#010x} {}", name, origin, length),
            Err(err) => {
                eprintln!("{}", err);
                return Ok(false);
            }
        },
        Command::Validate => {
            let device = load_device(cli)?;
            let errors = map.diagnose(&device);
            for err in &errors {
                eprintln!("{}", err);
            }
            if !errors.is_empty() {
                return Ok(false);
            }
            if cli.verbose {
                eprintln!("{} regions fit {}", map.len(), device.name);
            }
        }
        Command::Render { output } => {
            let text = render(&map);
            match output {
                Some(path) => {
                    fs::write(path, &text).with_context(|| format!("writing {}", path.display()))?;
                    if cli.verbose {
                        eprintln!("wrote {}", path.display());
                    }
                }
                None => print!("{}", text),
            }
        }
        Command::Check { elf } => return check(cli, &map, elf),
    }
    Ok(true)
}

fn check(cli: &Cli, map: &MemoryMap, path: &Path) -> Result<bool> {
    let device = load_device(cli)?;
    map.validate(&device).context("memory map is invalid")?;

    let buffer = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    check_image(cli, map, &buffer).with_context(|| format!("parsing {}", path.display()))
}

fn check_image(cli: &Cli, map: &MemoryMap, buffer: &[u8]) -> Result<bool> {
    let allocations = elf::allocations(buffer)?;

    let mut usage = Usage::new(map);
    let mut fits = true;
    for allocation in &allocations {
        if cli.verbose {
            eprintln!("{} bytes at {:#010x}: {}", allocation.size, allocation.address, allocation.label);
        }
        if let Err(err) = usage.charge_at(&allocation.label, allocation.address, allocation.size) {
            eprintln!("{}", err);
            fits = false;
        }
    }

    println!("{:<12} {:>10} {:>10} {:>10} {:>7}", "REGION", "USED", "FREE", "LENGTH", "USE%");
    for region in usage.report() {
        println!(
            "{:<12} {:>10} {:>10} {:>10} {:>6.1}%",
            region.name,
            region.used,
            region.free(),
            region.length,
            region.percent_used()
        );
    }
    Ok(fits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elf::tests::{elf64, segment};
    use memory_map::MemoryRegion;

    #[test]
    fn test_device_file_matches_builtin() {
        let device: DeviceBounds = serde_json::from_str(include_str!("../devices/atsaml21g18b.json")).unwrap();
        assert_eq!(device, DeviceBounds::atsaml21g18b());
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from(["memmap", "-v", "--memory", "memory.x", "resolve", "RAM"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.memory, Some(PathBuf::from("memory.x")));
        assert!(matches!(cli.command, Command::Resolve { ref name } if name == "RAM"));

        assert!(Cli::try_parse_from(["memmap", "resolve"]).is_err());
    }

    fn check_cli() -> Cli {
        Cli::try_parse_from(["memmap", "check", "firmware.elf"]).unwrap()
    }

    #[test]
    fn test_check_image_that_fits() {
        let image = elf64(
            &[
                segment(0x0, 0x0, 0x2000, 0x2000),
                segment(0x2000_0000, 0x2000, 0x100, 0x1000),
            ],
            &[(".text", 0x0, 0x2000), (".data", 0x2000_0000, 0x100), (".bss", 0x2000_0100, 0xF00)],
        );
        let map = atsaml21g18b::memory_map();

        assert!(check_image(&check_cli(), &map, &image).unwrap());
    }

    #[test]
    fn test_check_segment_outside_every_region() {
        let image = elf64(&[segment(0x1000_0000, 0x1000_0000, 0x10, 0x10)], &[]);
        let map = atsaml21g18b::memory_map();

        assert!(!check_image(&check_cli(), &map, &image).unwrap());
    }

    #[test]
    fn test_check_ram_overflow() {
        // 36K of .bss on a 32K part
        let image = elf64(&[segment(0x2000_0000, 0x2000_0000, 0, 0x9000)], &[(".bss", 0x2000_0000, 0x9000)]);
        let map = MemoryMap::new().with_region(MemoryRegion::new("RAM", 0x2000_0000, 64 * 1024));
        let small = atsaml21g18b::memory_map();

        assert!(check_image(&check_cli(), &map, &image).unwrap());
        assert!(!check_image(&check_cli(), &small, &image).unwrap());
    }

    #[test]
    fn test_check_rejects_garbage() {
        let map = atsaml21g18b::memory_map();
        assert!(check_image(&check_cli(), &map, &[0u8; 64]).is_err());
    }

    #[test]
    fn test_builtin_map_loads() {
        let cli = Cli::try_parse_from(["memmap", "validate"]).unwrap();
        let map = load_map(&cli).unwrap();
        assert_eq!(map.validate(&load_device(&cli).unwrap()), Ok(()));
    }
}
