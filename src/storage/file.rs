//! Document source files
//!
//! A document is read from a path, or from stdin when the path is `-`.
//! Write-back goes through a locked temp file and an atomic rename.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

/// Path that selects stdin instead of a file
pub const STDIN_PATH: &str = "-";

/// A timeline document on disk (or stdin)
#[derive(Debug, Clone)]
pub struct DocumentFile {
    path: PathBuf,
}

impl DocumentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if this reads from stdin
    pub fn is_stdin(&self) -> bool {
        self.path.as_os_str() == STDIN_PATH
    }

    /// Human-readable name for messages
    pub fn display_name(&self) -> String {
        if self.is_stdin() {
            "<stdin>".to_string()
        } else {
            self.path.display().to_string()
        }
    }

    /// Reads the whole document text
    pub fn read(&self) -> Result<String> {
        if self.is_stdin() {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read document from stdin")?;
            return Ok(text);
        }

        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open document: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on document")?;

        let mut text = String::new();
        file.read_to_string(&mut text)
            .with_context(|| format!("Failed to read document: {}", self.path.display()))?;

        // Lock is released when file is dropped
        Ok(text)
    }

    /// Replaces the document contents atomically
    pub fn write(&self, contents: &str) -> Result<()> {
        if self.is_stdin() {
            anyhow::bail!("Cannot write back to stdin; pass a file path instead");
        }

        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "timeline.json".to_string());
        let temp_path = self.path.with_file_name(format!(".{}.tmp", file_name));

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .context("Failed to acquire write lock on document")?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(contents.as_bytes())
                .context("Failed to write document")?;
            if !contents.ends_with('\n') {
                writer.write_all(b"\n").context("Failed to write document")?;
            }
            writer.flush().context("Failed to flush document")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}
