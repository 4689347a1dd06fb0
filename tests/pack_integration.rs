//! Integration tests for the packing pipeline
//!
//! Each test builds a small resource-pack tree in a temporary directory, runs
//! the packer through the library API and checks the written artifacts.

use blockatlas::config::{load_config, PackerConfig};
use blockatlas::discovery::TextureKind;
use blockatlas::{AtlasError, AtlasIndex, Packer, TextureId, UvLayout};
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_png(path: &Path, image: &RgbaImage) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    image.save(path).unwrap();
}

fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

fn config_for(packs: &[&str], size: u32) -> PackerConfig {
    let mut config = PackerConfig::default();
    config.project.packs = packs.iter().map(PathBuf::from).collect();
    config.atlas.size = size;
    config
}

fn id(s: &str) -> TextureId {
    s.parse().unwrap()
}

#[test]
fn test_slots_follow_sorted_discovery_order() {
    let temp = TempDir::new().unwrap();
    let blocks = temp.path().join("vanilla/minecraft/textures/block");
    write_png(&blocks.join("stone.png"), &solid(16, 16, [1, 1, 1, 255]));
    write_png(&blocks.join("dirt.png"), &solid(16, 16, [2, 2, 2, 255]));
    write_png(&blocks.join("ores/coal_ore.png"), &solid(16, 16, [3, 3, 3, 255]));
    write_png(&temp.path().join("vanilla/create/textures/block/gearbox.png"), &solid(16, 16, [4, 4, 4, 255]));

    let report = Packer::new(config_for(&["vanilla"], 64), temp.path()).run().unwrap();

    // Namespaces sorted, then relative paths sorted
    assert_eq!(report.index.slot(&id("create:block/gearbox")), Some(0));
    assert_eq!(report.index.slot(&id("minecraft:block/dirt")), Some(1));
    assert_eq!(report.index.slot(&id("minecraft:block/ores/coal_ore")), Some(2));
    assert_eq!(report.index.slot(&id("minecraft:block/stone")), Some(3));

    // Slots are contiguous from zero
    let mut slots: Vec<usize> = report.index.iter().map(|(_, s)| s).collect();
    slots.sort_unstable();
    assert_eq!(slots, vec![0, 1, 2, 3]);

    // 64 / 16 = 4 cells per line: all four fit on the bottom line
    let atlas = image::open(&report.outputs.as_ref().unwrap().image).unwrap().to_rgba8();
    assert_eq!(atlas.dimensions(), (64, 64));
    for slot in 0..4u32 {
        let pixel = atlas.get_pixel(slot * 16 + 8, 56);
        assert_eq!(pixel[0] as u32, [4, 2, 3, 1][slot as usize]);
    }
    assert_eq!(*atlas.get_pixel(8, 8), Rgba([0, 0, 0, 0]));
}

#[test]
fn test_written_index_is_sorted_and_indented() {
    let temp = TempDir::new().unwrap();
    let blocks = temp.path().join("vanilla/minecraft/textures/block");
    write_png(&blocks.join("b.png"), &solid(16, 16, [0, 0, 0, 255]));
    write_png(&blocks.join("a.png"), &solid(16, 16, [0, 0, 0, 255]));

    let report = Packer::new(config_for(&["vanilla"], 32), temp.path()).run().unwrap();
    let text = fs::read_to_string(&report.outputs.unwrap().index).unwrap();

    assert_eq!(text, "{\n    \"minecraft:block/a\": 0,\n    \"minecraft:block/b\": 1\n}");

    let loaded = AtlasIndex::from_json(&text).unwrap();
    assert_eq!(loaded, report.index);
}

#[test]
fn test_wide_and_tall_textures_are_normalized() {
    let temp = TempDir::new().unwrap();
    let blocks = temp.path().join("vanilla/minecraft/textures/block");

    // 8x24 animation strip: rescaled to 16x48, first frame kept
    let strip = RgbaImage::from_fn(8, 24, |_, y| {
        if y < 8 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) }
    });
    write_png(&blocks.join("a_strip.png"), &strip);
    // 32x16 wide texture: rescaled to 16x8, padded with transparent rows
    write_png(&blocks.join("b_wide.png"), &solid(32, 16, [0, 255, 0, 255]));

    let report = Packer::new(config_for(&["vanilla"], 32), temp.path())
        .with_dry_run(true)
        .run()
        .unwrap();

    let atlas = &report.atlas;
    // Slot 0 at x 0..16, y 16..32
    assert_eq!(*atlas.get_pixel(0, 16), Rgba([255, 0, 0, 255]));
    assert_eq!(*atlas.get_pixel(15, 31), Rgba([255, 0, 0, 255]));
    // Slot 1 at x 16..32, y 16..32
    assert_eq!(*atlas.get_pixel(16, 16), Rgba([0, 255, 0, 255]));
    assert_eq!(*atlas.get_pixel(16, 23), Rgba([0, 255, 0, 255]));
    assert_eq!(*atlas.get_pixel(16, 24), Rgba([0, 0, 0, 0]));
}

#[test]
fn test_full_resource_pack_layout_and_layering() {
    let temp = TempDir::new().unwrap();
    let hd = temp.path().join("hd");
    write_png(&hd.join("assets/minecraft/textures/block/stone.png"), &solid(32, 32, [9, 9, 9, 255]));
    fs::write(hd.join("pack.mcmeta"), r#"{"pack": {"pack_format": 15, "description": "HD"}}"#)
        .unwrap();

    let vanilla = temp.path().join("vanilla/minecraft/textures/block");
    write_png(&vanilla.join("stone.png"), &solid(16, 16, [200, 200, 200, 255]));
    write_png(&vanilla.join("dirt.png"), &solid(16, 16, [100, 60, 30, 255]));

    let report = Packer::new(config_for(&["hd", "vanilla"], 32), temp.path())
        .with_dry_run(true)
        .run()
        .unwrap();

    assert_eq!(report.placed, 2);
    assert_eq!(report.overridden, vec![id("minecraft:block/stone")]);
    // hd root is scanned first, so its stone takes slot 0
    assert_eq!(report.index.slot(&id("minecraft:block/stone")), Some(0));
    assert_eq!(report.index.slot(&id("minecraft:block/dirt")), Some(1));
    assert_eq!(*report.atlas.get_pixel(4, 20), Rgba([9, 9, 9, 255]));
}

#[test]
fn test_items_packed_after_blocks_when_enabled() {
    let temp = TempDir::new().unwrap();
    let ns = temp.path().join("vanilla/minecraft/textures");
    write_png(&ns.join("item/apple.png"), &solid(16, 16, [255, 0, 0, 255]));
    write_png(&ns.join("block/stone.png"), &solid(16, 16, [1, 1, 1, 255]));

    let blocks_only = Packer::new(config_for(&["vanilla"], 32), temp.path())
        .with_dry_run(true)
        .run()
        .unwrap();
    assert_eq!(blocks_only.placed, 1);

    let mut config = config_for(&["vanilla"], 32);
    config.atlas.kinds = vec![TextureKind::Block, TextureKind::Item];
    let both = Packer::new(config, temp.path()).with_dry_run(true).run().unwrap();
    assert_eq!(both.index.slot(&id("minecraft:block/stone")), Some(0));
    assert_eq!(both.index.slot(&id("minecraft:item/apple")), Some(1));
}

#[test]
fn test_recolor_preserves_alpha() {
    let temp = TempDir::new().unwrap();
    let blocks = temp.path().join("vanilla/minecraft/textures/block");
    let leaves = RgbaImage::from_fn(16, 16, |x, y| Rgba([(x * 16) as u8, (y * 16) as u8, 90, (x * y) as u8]));
    write_png(&blocks.join("oak_leaves.png"), &leaves);

    let report = Packer::new(config_for(&["vanilla"], 16), temp.path())
        .with_dry_run(true)
        .run()
        .unwrap();

    assert_eq!(report.recolored, vec![id("minecraft:block/oak_leaves")]);
    for (x, y, pixel) in report.atlas.enumerate_pixels() {
        assert_eq!(pixel[3], leaves.get_pixel(x, y)[3]);
    }
}

#[test]
fn test_capacity_exceeded_leaves_previous_artifacts() {
    let temp = TempDir::new().unwrap();
    let blocks = temp.path().join("vanilla/minecraft/textures/block");
    write_png(&blocks.join("a.png"), &solid(16, 16, [0, 0, 0, 255]));

    let first = Packer::new(config_for(&["vanilla"], 16), temp.path()).run().unwrap();
    let index_path = first.outputs.unwrap().index;
    let before = fs::read_to_string(&index_path).unwrap();

    write_png(&blocks.join("b.png"), &solid(16, 16, [0, 0, 0, 255]));
    let err = Packer::new(config_for(&["vanilla"], 16), temp.path()).run().unwrap_err();
    assert!(matches!(err, AtlasError::CapacityExceeded { capacity: 1, .. }));
    assert_eq!(fs::read_to_string(&index_path).unwrap(), before);
}

#[test]
fn test_config_file_drives_packer() {
    let temp = TempDir::new().unwrap();
    write_png(
        &temp.path().join("packs/base/mymod/textures/block/moss.png"),
        &solid(16, 16, [127, 127, 127, 255]),
    );
    let config_path = temp.path().join("atlas.toml");
    fs::write(
        &config_path,
        r##"
[project]
packs = ["packs/base"]
out = "generated"

[atlas]
size = 64
image = "terrain"
index = "terrain_slots"
builtin_recolors = false

[recolor]
"mymod:block/moss" = "#3a7a2a"
"##,
    )
    .unwrap();

    let config = load_config(Some(&config_path)).unwrap();
    let report = Packer::new(config, temp.path()).run().unwrap();

    let outputs = report.outputs.unwrap();
    assert_eq!(outputs.image, temp.path().join("generated/terrain.png"));
    assert_eq!(outputs.index, temp.path().join("generated/terrain_slots.json"));
    assert_eq!(report.recolored, vec![id("mymod:block/moss")]);

    // Mid-gray maps onto the tint itself
    let atlas = image::open(&outputs.image).unwrap().to_rgba8();
    assert_eq!(*atlas.get_pixel(0, 63), Rgba([0x3a, 0x7a, 0x2a, 255]));
}

#[test]
fn test_index_uvs_match_atlas_placement() {
    let temp = TempDir::new().unwrap();
    let blocks = temp.path().join("vanilla/minecraft/textures/block");
    for name in ["a", "b", "c", "d", "e"] {
        write_png(&blocks.join(format!("{name}.png")), &solid(16, 16, [0, 0, 0, 255]));
    }

    let report = Packer::new(config_for(&["vanilla"], 64), temp.path()).run().unwrap();
    let index = AtlasIndex::load(&report.outputs.unwrap().index).unwrap();
    let uv = UvLayout::new(4);

    // Fifth texture wraps to the second line from the bottom
    let slot = index.slot(&id("block/e")).unwrap();
    assert_eq!(slot, 4);
    assert_eq!(uv.cell_uv(slot), [0.0, 0.25]);
    assert_eq!(index.slot_or_default(&id("block/missing")), 0);
}
