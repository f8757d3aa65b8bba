
use anyhow::{bail, Result};
use goblin::elf::program_header::PT_LOAD;
use goblin::Object;

/// Bytes an ELF image asks for at one address.
#[derive(Debug)]
pub struct Allocation {
    pub label: String,
    pub address: u64,
    pub size: u64,
}

/// Memory each `PT_LOAD` segment occupies: its run-time footprint at the
/// virtual address and, for initialised data copied out of flash at boot,
/// the load image at the physical address.
pub fn allocations(buffer: &[u8]) -> Result<Vec<Allocation>> {
    let elf = match Object::parse(buffer)? {
        Object::Elf(elf) => elf,
        _ => bail!("not an ELF file"),
    };

    let mut allocations = vec![];
    for (i, ph) in elf.program_headers.iter().enumerate() {
        if ph.p_type != PT_LOAD || ph.p_memsz == 0 {
            continue;
        }
        let label = section_names(&elf, ph.p_vaddr, ph.p_memsz).unwrap_or_else(|| format!("segment {}", i));

        allocations.push(Allocation {
            label: label.clone(),
            address: ph.p_vaddr,
            size: ph.p_memsz,
        });
        if ph.p_paddr != ph.p_vaddr && ph.p_filesz > 0 {
            allocations.push(Allocation {
                label: format!("{} (load image)", label),
                address: ph.p_paddr,
                size: ph.p_filesz,
            });
        }
    }
    Ok(allocations)
}

// Names of the allocated sections inside a segment, for readable reports.
// A range whose end does not fit in 64 bits contains nothing.
fn section_names(elf: &goblin::elf::Elf, vaddr: u64, memsz: u64) -> Option<String> {
    let segment_end = vaddr.checked_add(memsz)?;
    let names: Vec<&str> = elf
        .section_headers
        .iter()
        .filter(|s| s.is_alloc() && s.sh_size > 0)
        .filter(|s| {
            s.sh_addr >= vaddr
                && s.sh_addr.checked_add(s.sh_size).map_or(false, |end| end <= segment_end)
        })
        .filter_map(|s| elf.shdr_strtab.get_at(s.sh_name))
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(" "))
    }
}
