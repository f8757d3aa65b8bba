use super::*;
use crate::parse::ParseErrorKind;
use crate::render::render;

#[test]
fn test_parse_checked_in_memory_x() {
    let map: MemoryMap = atsaml21g18b::MEMORY_X.parse().unwrap();

    assert_eq!(map.resolve("FLASH"), Ok((0x0000_0000, 256 * 1024)));
    assert_eq!(map.resolve("RAM"), Ok((0x2000_0000, 32 * 1024)));
    assert_eq!(map.len(), 2);
}

#[test]
fn test_render_then_parse() {
    let (map, _) = saml21();

    let text = render(&map);
    let reparsed: MemoryMap = text.parse().unwrap();
    assert!(reparsed.is_equivalent(&map));
    assert_eq!(reparsed, map);
}

#[test]
fn test_parse_render_parse_with_cortex_m_extras() {
    let text = include_str!("test_data/cortex_m.x");
    let map: MemoryMap = text.parse().unwrap();
    let reparsed: MemoryMap = render(&map).parse().unwrap();

    assert!(reparsed.is_equivalent(&map));
    assert_eq!(reparsed.get("FLASH").unwrap().attributes.as_deref(), Some("rx"));
    assert_eq!(reparsed.resolve("BOOTLOADER"), Ok((0, 8 * 1024)));
    assert_eq!(reparsed.resolve("FLASH"), Ok((8 * 1024, 248 * 1024)));
    assert_eq!(reparsed.resolve("RAM"), Ok((0x2000_0000, 0x8000)));
    assert_eq!(map.validate(&DeviceBounds::atsaml21g18b()), Ok(()));
}

#[test]
fn test_equivalence_ignores_order() {
    let forward = MemoryMap::new()
        .with_region(region("FLASH", 0, 1024))
        .with_region(region("RAM", 0x2000_0000, 1024));
    let backward = MemoryMap::new()
        .with_region(region("RAM", 0x2000_0000, 1024))
        .with_region(region("FLASH", 0, 1024));
    let resized = MemoryMap::new()
        .with_region(region("RAM", 0x2000_0000, 2048))
        .with_region(region("FLASH", 0, 1024));

    assert!(forward.is_equivalent(&backward));
    assert_ne!(forward, backward);
    assert!(!forward.is_equivalent(&resized));
}

#[test]
fn test_kibibyte_not_kilobyte() {
    let map: MemoryMap = "MEMORY { RAM : ORIGIN = 0x20000000, LENGTH = 32K }".parse().unwrap();
    assert_eq!(map.resolve("RAM"), Ok((0x2000_0000, 32_768)));
    assert_ne!(map.resolve("RAM"), Ok((0x2000_0000, 32_000)));
}

#[test]
fn test_parse_error_converts() {
    let err = "MEMORY { RAM : ORIGIN = 0x20000000 }".parse::<MemoryMap>().unwrap_err();
    let err = MemoryMapError::from(err);
    assert!(matches!(
        err,
        MemoryMapError::Parse(ParseError { kind: ParseErrorKind::Unexpected { expected: "LENGTH", .. }, .. })
    ));
}
