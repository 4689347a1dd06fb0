//! Pack progress reporting.
//!
//! Events are emitted by the [`Packer`](crate::pipeline::Packer) as it walks
//! the pack roots and fills the atlas. Reporters decide how (and whether) to
//! show them: [`NullProgress`] discards everything, [`ConsoleProgress`] writes
//! human-readable lines to stderr, [`JsonProgress`] writes one JSON object
//! per line.
//!
//! # Example
//!
//! ```
//! use blockatlas::progress::{ProgressEvent, ProgressReporter, JsonProgress};
//!
//! let reporter = JsonProgress::with_output(Vec::new());
//! reporter.report(ProgressEvent::PackStarted { total_textures: 3, capacity: 1024 });
//! ```

use serde::Serialize;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Events that can be reported during a pack run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Discovery finished, placement is about to start
    PackStarted {
        /// Number of textures that will be considered
        total_textures: usize,
        /// Number of cells in the atlas
        capacity: usize,
    },
    /// A pack root was scanned
    PackRootLoaded {
        /// Pack root as configured
        path: String,
        /// `pack.description` from pack.mcmeta, if any
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// Textures this root contributed after layering
        textures: usize,
    },
    /// A texture was written into a cell
    TexturePlaced {
        /// Texture identifier
        id: String,
        /// Assigned slot
        slot: usize,
        /// Whether a tint was applied
        recolored: bool,
    },
    /// A texture was left out of the atlas
    TextureSkipped {
        /// Texture identifier
        id: String,
        /// Why it was skipped
        reason: String,
    },
    /// A texture from a lower-priority root was shadowed
    TextureOverridden {
        /// Texture identifier
        id: String,
        /// Pack root whose copy was dropped
        dropped: String,
    },
    /// Something worth telling the user that does not stop the run
    Warning {
        /// Texture or pack the warning concerns
        #[serde(skip_serializing_if = "Option::is_none")]
        subject: Option<String>,
        /// Warning message
        message: String,
    },
    /// The run finished
    PackCompleted {
        /// Number of placed textures
        placed: usize,
        /// Number of excluded textures
        skipped: usize,
        /// Number of shadowed textures
        overridden: usize,
        /// Total duration in milliseconds
        duration_ms: u64,
        /// Whether artifacts were left unwritten
        dry_run: bool,
    },
}

/// Trait for progress reporters.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event.
    fn report(&self, event: ProgressEvent);

    /// Check if this reporter wants verbose output.
    fn is_verbose(&self) -> bool {
        false
    }
}

/// A progress reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullProgress;

impl NullProgress {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for NullProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Console progress reporter with optional colors.
pub struct ConsoleProgress {
    use_colors: bool,
    verbose: bool,
    /// Cells filled so far
    placed: AtomicUsize,
    /// Textures expected in this run
    total: AtomicUsize,
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgress")
            .field("use_colors", &self.use_colors)
            .field("verbose", &self.verbose)
            .field("placed", &self.placed)
            .field("total", &self.total)
            .finish()
    }
}

impl ConsoleProgress {
    /// Create a console progress reporter writing to stderr.
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
            placed: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Create a console progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self {
            use_colors: false,
            verbose: false,
            placed: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(output)),
        }
    }

    /// Set whether to use colors.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.color(text, "\x1b[32m")
    }

    fn yellow(&self, text: &str) -> String {
        self.color(text, "\x1b[33m")
    }

    fn cyan(&self, text: &str) -> String {
        self.color(text, "\x1b[36m")
    }

    fn bold(&self, text: &str) -> String {
        self.color(text, "\x1b[1m")
    }

    fn writeln(&self, line: &str) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", line);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::PackStarted { total_textures, capacity } => {
                self.total.store(total_textures, Ordering::SeqCst);
                self.placed.store(0, Ordering::SeqCst);
                self.writeln(&format!(
                    "{} Packing {} texture{} into {} cells...",
                    self.cyan("[pack]"),
                    total_textures,
                    if total_textures == 1 { "" } else { "s" },
                    capacity
                ));
            }
            ProgressEvent::PackRootLoaded { path, description, textures } => {
                let description = match description {
                    Some(d) if !d.is_empty() => format!(" ({})", d),
                    _ => String::new(),
                };
                self.writeln(&format!(
                    "{} {}{}: {} texture{}",
                    self.cyan("[pack]"),
                    path,
                    description,
                    textures,
                    if textures == 1 { "" } else { "s" }
                ));
            }
            ProgressEvent::TexturePlaced { id, slot, recolored } => {
                let placed = self.placed.fetch_add(1, Ordering::SeqCst) + 1;
                if self.verbose {
                    let total = self.total.load(Ordering::SeqCst);
                    let tint = if recolored { " (recolored)" } else { "" };
                    self.writeln(&format!(
                        "{} [{}/{}] {} -> slot {}{}",
                        self.cyan("[pack]"),
                        placed,
                        total,
                        id,
                        slot,
                        tint
                    ));
                }
            }
            ProgressEvent::TextureSkipped { id, reason } => {
                if self.verbose {
                    self.writeln(&format!(
                        "{} {} {} ({})",
                        self.cyan("[pack]"),
                        self.yellow("skipped"),
                        id,
                        reason
                    ));
                }
            }
            ProgressEvent::TextureOverridden { id, dropped } => {
                if self.verbose {
                    self.writeln(&format!(
                        "{} {} {} from {}",
                        self.cyan("[pack]"),
                        self.yellow("overridden"),
                        id,
                        dropped
                    ));
                }
            }
            ProgressEvent::Warning { subject, message } => {
                let prefix = match subject {
                    Some(s) => format!("{}: ", s),
                    None => String::new(),
                };
                self.writeln(&format!("{} {}{}", self.yellow("[warn]"), prefix, message));
            }
            ProgressEvent::PackCompleted { placed, skipped, overridden, duration_ms, dry_run } => {
                let label = if dry_run { "[dry-run]" } else { "[done]" };
                self.writeln(&format!(
                    "\n{} {} {} placed, {} skipped, {} overridden in {}",
                    self.green(label),
                    self.bold(&placed.to_string()),
                    if placed == 1 { "texture" } else { "textures" },
                    skipped,
                    overridden,
                    format_duration(duration_ms)
                ));
            }
        }
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// JSON progress reporter for machine-readable output.
pub struct JsonProgress {
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for JsonProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonProgress").finish()
    }
}

impl JsonProgress {
    /// Create a JSON progress reporter writing to stderr.
    pub fn new() -> Self {
        Self { output: Mutex::new(Box::new(std::io::stderr())) }
    }

    /// Create a JSON progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self { output: Mutex::new(Box::new(output)) }
    }
}

impl Default for JsonProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for JsonProgress {
    fn report(&self, event: ProgressEvent) {
        let Ok(json) = serde_json::to_string(&event) else {
            return;
        };
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", json);
        }
    }

    fn is_verbose(&self) -> bool {
        true
    }
}

/// Format a duration in milliseconds to a human-readable string.
fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1000;
        format!("{}m {}s", minutes, seconds)
    }
}
