//! Lookup command implementation

use std::path::Path;
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::identifier::TextureId;
use crate::index::{AtlasIndex, Rotation, UvLayout};

const FULL_FACE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// Run the lookup command
pub fn run_lookup(
    index_path: &Path,
    id: &str,
    cells_per_line: u32,
    rotation: u8,
    part: Option<&[f32]>,
    fallback: bool,
    json: bool,
) -> ExitCode {
    let id: TextureId = match id.parse() {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let part = match part {
        None => FULL_FACE,
        Some(&[x1, y1, x2, y2]) => [x1, y1, x2, y2],
        Some(values) => {
            eprintln!("Error: --part takes 4 values, got {}", values.len());
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let index = match AtlasIndex::load(index_path) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", index_path.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let slot = match index.slot(&id) {
        Some(slot) => slot,
        None if fallback => {
            eprintln!("Warning: {} not in index, using slot 0", id);
            index.slot_or_default(&id)
        }
        None => {
            eprintln!("Error: {} not in index", id);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let layout = UvLayout::new(cells_per_line);
    let uv = layout.cell_uv(slot);
    let face = layout.face_uvs(slot, part, Rotation::from_quarter_turns(rotation));

    if json {
        let out = serde_json::json!({
            "id": id.to_string(),
            "slot": slot,
            "uv": uv,
            "face": face,
        });
        println!("{}", out);
    } else {
        println!("{}", id);
        println!("  slot: {}", slot);
        println!("  uv:   {}, {}", uv[0], uv[1]);
        let corners: Vec<String> = face.iter().map(|[u, v]| format!("({}, {})", u, v)).collect();
        println!("  face: {}", corners.join(" "));
    }

    ExitCode::from(EXIT_SUCCESS)
}
