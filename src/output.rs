//! PNG output and artifact path generation

use image::{ImageFormat, RgbaImage};
use std::io;
use std::path::{Path, PathBuf};

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// Save an RGBA image as PNG, creating parent directories as needed.
///
/// The format is always PNG regardless of the file extension.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Where a pack run writes its two artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Atlas image
    pub image: PathBuf,
    /// Slot index JSON
    pub index: PathBuf,
}

/// Build the artifact paths inside `out_dir`.
///
/// An image name without an extension gets `.png`; an index name without one
/// gets `.json`.
pub fn artifact_paths(out_dir: &Path, image_name: &str, index_name: &str) -> ArtifactPaths {
    ArtifactPaths {
        image: with_default_extension(out_dir.join(image_name), "png"),
        index: with_default_extension(out_dir.join(index_name), "json"),
    }
}

/// Hidden sibling used while an artifact is being written (`.name.tmp`).
pub fn staging_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

fn with_default_extension(path: PathBuf, ext: &str) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_artifact_paths_defaults() {
        let paths = artifact_paths(Path::new("build"), "block_atlas.png", "block_atlas_dict.json");
        assert_eq!(paths.image, PathBuf::from("build/block_atlas.png"));
        assert_eq!(paths.index, PathBuf::from("build/block_atlas_dict.json"));
    }

    #[test]
    fn test_artifact_paths_adds_extensions() {
        let paths = artifact_paths(Path::new("out"), "atlas", "atlas_index");
        assert_eq!(paths.image, PathBuf::from("out/atlas.png"));
        assert_eq!(paths.index, PathBuf::from("out/atlas_index.json"));
    }

    #[test]
    fn test_staging_path_is_hidden_sibling() {
        assert_eq!(
            staging_path(Path::new("build/block_atlas.png")),
            PathBuf::from("build/.block_atlas.png.tmp")
        );
    }

    #[test]
    fn test_save_png_basic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("atlas.png");

        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 1, Rgba([0, 0, 255, 128]));

        save_png(&image, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (2, 2));
        assert_eq!(*loaded.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*loaded.get_pixel(1, 1), Rgba([0, 0, 255, 128]));
        assert_eq!(*loaded.get_pixel(1, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_save_png_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("atlas.png");

        save_png(&RgbaImage::new(1, 1), &path).unwrap();
        assert!(path.exists());
    }
}
