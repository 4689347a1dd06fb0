//! CLI integration tests for `pack` and `lookup`
//!
//! These tests run the compiled binary against resource packs built in a
//! temporary directory and check exit codes and written artifacts.

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn blockatlas(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_blockatlas"));
    // Keep config discovery inside the temp dir
    cmd.current_dir(dir).env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd
}

fn write_texture(path: &Path, color: [u8; 4]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(16, 16, Rgba(color)).save(path).unwrap();
}

fn vanilla_pack(dir: &Path) {
    let blocks = dir.join("resourcepacks/vanilla/minecraft/textures/block");
    write_texture(&blocks.join("dirt.png"), [120, 80, 40, 255]);
    write_texture(&blocks.join("stone.png"), [128, 128, 128, 255]);
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_pack_with_defaults() {
    let temp = TempDir::new().unwrap();
    vanilla_pack(temp.path());

    let output = blockatlas(temp.path()).arg("pack").output().expect("Failed to execute blockatlas");
    assert!(output.status.success(), "pack failed: {}", stderr(&output));

    let image_path = temp.path().join("build/block_atlas.png");
    let index_path = temp.path().join("build/block_atlas_dict.json");
    let atlas = image::open(&image_path).unwrap();
    assert_eq!((atlas.width(), atlas.height()), (512, 512));

    let index = fs::read_to_string(&index_path).unwrap();
    assert_eq!(index, "{\n    \"minecraft:block/dirt\": 0,\n    \"minecraft:block/stone\": 1\n}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("block_atlas.png"));
}

#[test]
fn test_pack_uses_atlas_toml() {
    let temp = TempDir::new().unwrap();
    vanilla_pack(temp.path());
    fs::write(
        temp.path().join("atlas.toml"),
        "[project]\nout = \"dist\"\n\n[atlas]\nsize = 64\nexclude = [\"block/stone\"]\n",
    )
    .unwrap();

    let nested = temp.path().join("resourcepacks");
    let output = blockatlas(&nested).arg("pack").output().unwrap();
    assert!(output.status.success(), "pack failed: {}", stderr(&output));

    let index = fs::read_to_string(temp.path().join("dist/block_atlas_dict.json")).unwrap();
    assert_eq!(index, "{\n    \"minecraft:block/dirt\": 0\n}");
    let atlas = image::open(temp.path().join("dist/block_atlas.png")).unwrap();
    assert_eq!(atlas.width(), 64);
}

#[test]
fn test_pack_cli_overrides() {
    let temp = TempDir::new().unwrap();
    write_texture(&temp.path().join("hd/minecraft/textures/block/dirt.png"), [1, 2, 3, 255]);
    vanilla_pack(temp.path());

    let output = blockatlas(temp.path())
        .args(["pack", "--pack", "hd", "--pack", "resourcepacks/vanilla"])
        .args(["--out", "custom", "--size", "32", "--cell-size", "16"])
        .output()
        .unwrap();
    assert!(output.status.success(), "pack failed: {}", stderr(&output));

    let atlas = image::open(temp.path().join("custom/block_atlas.png")).unwrap().to_rgba8();
    assert_eq!(atlas.dimensions(), (32, 32));
    assert_eq!(*atlas.get_pixel(0, 16), Rgba([1, 2, 3, 255]));
}

#[test]
fn test_pack_dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    vanilla_pack(temp.path());

    let output = blockatlas(temp.path()).args(["pack", "--dry-run"]).output().unwrap();
    assert!(output.status.success(), "pack failed: {}", stderr(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Dry run"));
    assert!(!temp.path().join("build").exists());
}

#[test]
fn test_pack_json_output() {
    let temp = TempDir::new().unwrap();
    vanilla_pack(temp.path());

    let output = blockatlas(temp.path()).args(["pack", "--json"]).output().unwrap();
    assert!(output.status.success(), "pack failed: {}", stderr(&output));

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["placed"], 2);

    let events: Vec<serde_json::Value> =
        stderr(&output).lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(events.first().unwrap()["event"], "pack_root_loaded");
    assert_eq!(events.last().unwrap()["event"], "pack_completed");
    assert_eq!(events.iter().filter(|e| e["event"] == "texture_placed").count(), 2);
}

#[test]
fn test_pack_missing_root_fails() {
    let temp = TempDir::new().unwrap();
    let output = blockatlas(temp.path()).args(["pack", "--pack", "nowhere"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("resource pack not found"));
}

#[test]
fn test_pack_overflow_fails() {
    let temp = TempDir::new().unwrap();
    vanilla_pack(temp.path());

    let output = blockatlas(temp.path()).args(["pack", "--size", "16"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("atlas is full"));
    assert!(!temp.path().join("build/block_atlas_dict.json").exists());
}

#[test]
fn test_pack_invalid_geometry_is_invalid_args() {
    let temp = TempDir::new().unwrap();
    vanilla_pack(temp.path());

    let output = blockatlas(temp.path()).args(["pack", "--size", "100"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("atlas.size"));
}

#[test]
fn test_pack_invalid_atlas_toml_is_invalid_args() {
    let temp = TempDir::new().unwrap();
    vanilla_pack(temp.path());
    fs::write(temp.path().join("atlas.toml"), "[atlas]\nsize = 100\n").unwrap();

    let output = blockatlas(temp.path()).arg("pack").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("atlas.size"));
    assert!(!temp.path().join("build").exists());
}

#[test]
fn test_pack_cli_size_fixes_atlas_toml() {
    let temp = TempDir::new().unwrap();
    vanilla_pack(temp.path());
    fs::write(temp.path().join("atlas.toml"), "[atlas]\nsize = 100\n").unwrap();

    let output = blockatlas(temp.path()).args(["pack", "--size", "64"]).output().unwrap();
    assert!(output.status.success(), "pack failed: {}", stderr(&output));
    let atlas = image::open(temp.path().join("build/block_atlas.png")).unwrap();
    assert_eq!(atlas.width(), 64);
}

#[test]
fn test_pack_malformed_atlas_toml_is_invalid_args() {
    let temp = TempDir::new().unwrap();
    vanilla_pack(temp.path());
    fs::write(temp.path().join("atlas.toml"), "[atlas\nsize = ").unwrap();

    let output = blockatlas(temp.path()).arg("pack").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to parse atlas.toml"));
}

#[test]
fn test_lookup_prints_slot_and_uvs() {
    let temp = TempDir::new().unwrap();
    let index = temp.path().join("index.json");
    fs::write(&index, r#"{"minecraft:block/dirt": 0, "minecraft:block/stone": "33"}"#).unwrap();

    let output = blockatlas(temp.path())
        .args(["lookup", "index.json", "stone", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "lookup failed: {}", stderr(&output));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["id"], "minecraft:block/stone");
    assert_eq!(result["slot"], 33);
    assert_eq!(result["uv"][0], 0.03125);
    assert_eq!(result["uv"][1], 0.03125);
}

#[test]
fn test_lookup_missing_id() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("index.json"), r#"{"minecraft:block/dirt": 3}"#).unwrap();

    let output = blockatlas(temp.path()).args(["lookup", "index.json", "block/lava"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let output = blockatlas(temp.path())
        .args(["lookup", "index.json", "block/lava", "--fallback"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("slot: 0"));
}

#[test]
fn test_lookup_rejects_duplicate_index() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("index.json"), r#"{"block/dirt": 0, "minecraft:block/dirt": 1}"#)
        .unwrap();

    let output = blockatlas(temp.path()).args(["lookup", "index.json", "block/dirt"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("duplicate atlas entry"));
}

#[test]
fn test_lookup_bad_rotation_is_invalid_args() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("index.json"), "{}").unwrap();

    let output = blockatlas(temp.path())
        .args(["lookup", "index.json", "block/dirt", "--rotation", "4"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}
