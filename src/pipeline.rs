//! Pack pipeline orchestration.
//!
//! Discovers textures, normalizes and recolors them, fills the atlas grid and
//! writes the atlas image and slot index. Nothing is written until every
//! texture has been placed, so a failed run leaves previous artifacts intact.

use crate::atlas::Atlas;
use crate::config::{check_config, resolve_path, ConfigError, PackerConfig};
use crate::discovery::{discover, TextureSource};
use crate::error::AtlasError;
use crate::identifier::TextureId;
use crate::index::{AtlasIndex, IndexError};
use crate::normalize::normalize;
use crate::output::{artifact_paths, save_png, staging_path, ArtifactPaths, OutputError};
use crate::progress::{NullProgress, ProgressEvent, ProgressReporter};
use crate::recolor::recolor;
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Outcome of a successful pack run.
#[derive(Debug)]
pub struct PackReport {
    /// Number of textures placed
    pub placed: usize,
    /// Identifiers left out by the exclusion list
    pub skipped: Vec<TextureId>,
    /// Identifiers whose lower-priority copies were dropped
    pub overridden: Vec<TextureId>,
    /// Identifiers that had a tint applied
    pub recolored: Vec<TextureId>,
    /// Written artifacts (`None` on a dry run)
    pub outputs: Option<ArtifactPaths>,
    /// Wall-clock time of the run
    pub duration: Duration,
    /// Identifier to slot mapping
    pub index: AtlasIndex,
    /// Composed atlas image
    pub atlas: RgbaImage,
}

impl PackReport {
    /// One-line human summary.
    pub fn summary(&self) -> String {
        format!(
            "{} placed, {} skipped, {} overridden, {} recolored",
            self.placed,
            self.skipped.len(),
            self.overridden.len(),
            self.recolored.len()
        )
    }
}

/// Runs one pack job from a validated configuration.
pub struct Packer {
    config: PackerConfig,
    project_root: PathBuf,
    reporter: Box<dyn ProgressReporter>,
    dry_run: bool,
}

impl Packer {
    /// Create a packer. Relative paths in `config` resolve against
    /// `project_root`.
    pub fn new(config: PackerConfig, project_root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            project_root: project_root.into(),
            reporter: Box::new(NullProgress::new()),
            dry_run: false,
        }
    }

    /// Set the progress reporter.
    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Set dry-run mode (pack in memory, write nothing).
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config(&self) -> &PackerConfig {
        &self.config
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Pack roots resolved against the project root, in priority order.
    pub fn pack_roots(&self) -> Vec<PathBuf> {
        self.config.project.packs.iter().map(|p| resolve_path(&self.project_root, p)).collect()
    }

    /// Where the artifacts of this run go.
    pub fn artifact_paths(&self) -> ArtifactPaths {
        let out_dir = resolve_path(&self.project_root, &self.config.project.out);
        artifact_paths(&out_dir, &self.config.atlas.image, &self.config.atlas.index)
    }

    /// Run the pack job.
    pub fn run(&self) -> Result<PackReport, AtlasError> {
        let start = Instant::now();

        check_config(&self.config)?;
        let layout = self.config.layout()?;
        let exclusions = self.config.exclusions().map_err(invalid_config)?;
        let recolors = self.config.recolor_table().map_err(invalid_config)?;
        let filter = self.config.atlas.filter.filter_type();

        let roots = self.pack_roots();
        let discovery = discover(&roots, &self.config.atlas.kinds)?;

        for warning in &discovery.warnings {
            self.reporter.report(ProgressEvent::Warning {
                subject: Some(warning.subject.display().to_string()),
                message: warning.message.clone(),
            });
        }
        for (idx, pack) in discovery.packs.iter().enumerate() {
            self.reporter.report(ProgressEvent::PackRootLoaded {
                path: pack.path.display().to_string(),
                description: pack.description.clone(),
                textures: discovery.textures.iter().filter(|t| t.pack == idx).count(),
            });
        }

        let mut overridden = Vec::with_capacity(discovery.overridden.len());
        for source in &discovery.overridden {
            self.reporter.report(ProgressEvent::TextureOverridden {
                id: source.id.to_string(),
                dropped: roots[source.pack].display().to_string(),
            });
            overridden.push(source.id.clone());
        }

        self.reporter.report(ProgressEvent::PackStarted {
            total_textures: discovery.textures.len(),
            capacity: layout.capacity(),
        });

        let mut atlas = Atlas::new(layout);
        let mut skipped = Vec::new();
        let mut recolored = Vec::new();

        for source in &discovery.textures {
            if exclusions.contains(&source.id) {
                self.reporter.report(ProgressEvent::TextureSkipped {
                    id: source.id.to_string(),
                    reason: "excluded".to_string(),
                });
                skipped.push(source.id.clone());
                continue;
            }

            let mut cell = normalize(load_texture(source)?, layout.cell_size(), filter);
            let tint = recolors.get(&source.id);
            if let Some(tint) = tint {
                cell = recolor(&cell, tint);
                recolored.push(source.id.clone());
            }

            let slot = atlas.place(&source.id, &cell)?;
            self.reporter.report(ProgressEvent::TexturePlaced {
                id: source.id.to_string(),
                slot,
                recolored: tint.is_some(),
            });
        }

        let (image, index) = atlas.into_parts();

        let outputs = if self.dry_run {
            None
        } else {
            let paths = self.artifact_paths();
            write_artifacts(&image, &index, &paths)?;
            Some(paths)
        };

        let duration = start.elapsed();
        self.reporter.report(ProgressEvent::PackCompleted {
            placed: index.len(),
            skipped: skipped.len(),
            overridden: overridden.len(),
            duration_ms: duration.as_millis() as u64,
            dry_run: self.dry_run,
        });

        Ok(PackReport {
            placed: index.len(),
            skipped,
            overridden,
            recolored,
            outputs,
            duration,
            index,
            atlas: image,
        })
    }
}

/// Write the atlas image and index side by side.
///
/// Both files go to hidden staging siblings first and are moved into place
/// only after both were written.
fn write_artifacts(
    image: &RgbaImage,
    index: &AtlasIndex,
    paths: &ArtifactPaths,
) -> Result<(), AtlasError> {
    let index_err = |source: IndexError| AtlasError::Index { path: paths.index.clone(), source };
    let json = index.to_json().map_err(index_err)?;

    for target in [&paths.image, &paths.index] {
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|source| AtlasError::Io { path: parent.to_path_buf(), source })?;
            }
        }
    }

    let image_tmp = staging_path(&paths.image);
    let index_tmp = staging_path(&paths.index);
    let cleanup = || {
        let _ = fs::remove_file(&image_tmp);
        let _ = fs::remove_file(&index_tmp);
    };

    if let Err(source) = save_png(image, &image_tmp) {
        cleanup();
        return Err(AtlasError::Encode { path: paths.image.clone(), source });
    }
    if let Err(e) = fs::write(&index_tmp, json) {
        cleanup();
        return Err(index_err(IndexError::Io(e)));
    }
    if let Err(e) = fs::rename(&index_tmp, &paths.index) {
        cleanup();
        return Err(index_err(IndexError::Io(e)));
    }
    if let Err(e) = fs::rename(&image_tmp, &paths.image) {
        cleanup();
        return Err(AtlasError::Encode { path: paths.image.clone(), source: OutputError::Io(e) });
    }
    Ok(())
}

/// Open a texture file and convert it to RGBA.
pub fn load_texture(source: &TextureSource) -> Result<RgbaImage, AtlasError> {
    image::open(&source.path)
        .map(|img| img.to_rgba8())
        .map_err(|e| AtlasError::Decode { path: source.path.clone(), source: e })
}

fn invalid_config(e: impl std::fmt::Display) -> AtlasError {
    AtlasError::Config(ConfigError::Validation(vec![e.to_string()]))
}
