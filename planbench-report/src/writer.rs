//! Report Files
//!
//! Places a finished report on disk. The default file name is derived
//! from the host and start time so consecutive runs never collide.

use crate::json::generate_json_report;
use crate::log::write_log_report;
use crate::report::{BenchmarkReport, ReportMeta};
use planbench_metrics::EntryStatistics;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error writing a report
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem failure
    #[error("failed to write report to {path}: {source}")]
    Io {
        /// Target file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// JSON serialization failure
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Report file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Self-describing line-oriented log
    #[default]
    Log,
    /// JSON with per-entry summaries
    Json,
}

impl OutputFormat {
    /// File extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Log => "log",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log" | "text" => Ok(OutputFormat::Log),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Writes reports into a directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    directory: PathBuf,
    format: OutputFormat,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ReportWriter {
    /// Log-format writer targeting `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            format: OutputFormat::Log,
        }
    }

    /// Select the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Target directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Selected format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// `planbench_<host>_<timestamp>.<ext>`
    pub fn default_filename(&self, meta: &ReportMeta) -> String {
        format!(
            "planbench_{}_{}.{}",
            meta.host_label(),
            meta.started_at_label(),
            self.format.extension()
        )
    }

    /// Resolve the target path; an empty `filename` selects the default name
    pub fn target_path(&self, meta: &ReportMeta, filename: Option<&str>) -> PathBuf {
        match filename {
            Some(name) if !name.is_empty() => {
                let path = Path::new(name);
                if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    self.directory.join(path)
                }
            }
            _ => self.directory.join(self.default_filename(meta)),
        }
    }

    /// Write `report` and return the path written.
    ///
    /// A partially written file is removed on failure.
    pub fn write(
        &self,
        report: &BenchmarkReport,
        filename: Option<&str>,
        statistics: &[EntryStatistics],
    ) -> Result<PathBuf, ReportError> {
        let path = self.target_path(&report.meta, filename);

        // Serialize up front so a JSON failure never leaves a file behind
        let json = match self.format {
            OutputFormat::Json => Some(generate_json_report(report, statistics)?),
            OutputFormat::Log => None,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
        }

        let (file, regular) = open_target(&path).map_err(|source| {
            tracing::error!("Failed to create report {}: {}", path.display(), source);
            ReportError::Io {
                path: path.clone(),
                source,
            }
        })?;
        self.fill(path, file, regular, report, json.as_deref())
    }

    /// Stream the report body into an opened sink; `regular` marks a plain
    /// file that may be removed if the body cannot be written completely.
    fn fill<W: Write>(
        &self,
        path: PathBuf,
        sink: W,
        regular: bool,
        report: &BenchmarkReport,
        json: Option<&str>,
    ) -> Result<PathBuf, ReportError> {
        let mut out = BufWriter::new(sink);
        let result = match json {
            Some(text) => out.write_all(text.as_bytes()),
            None => write_log_report(report, &mut out),
        }
        .and_then(|_| out.flush());
        drop(out);

        if let Err(source) = result {
            if regular {
                let _ = fs::remove_file(&path);
            }
            tracing::error!("Failed to write report {}: {}", path.display(), source);
            return Err(ReportError::Io { path, source });
        }

        tracing::info!("Report written to {}", path.display());
        Ok(path)
    }
}

/// Open `path` for writing; the flag tells whether it is a regular file
fn open_target(path: &Path) -> io::Result<(File, bool)> {
    let file = File::create(path)?;
    let regular = file.metadata()?.is_file();
    Ok((file, regular))
}
