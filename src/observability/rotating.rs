//! Size-rotated append-only file for trace lines.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Rotate once the active file grows past this size (10 MB).
pub const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;

/// Rotated files kept next to the active one.
pub const KEEP_BACKUPS: usize = 3;

struct Active {
    file: File,
    len: u64,
}

/// Line writer that renames the active file to `<name>.<utc timestamp>` once
/// it exceeds `limit` bytes and keeps only the newest `keep` backups.
pub struct RotatingFile {
    path: PathBuf,
    limit: u64,
    keep: usize,
    active: Mutex<Option<Active>>,
}

impl RotatingFile {
    /// Creates a writer with the default limits.
    ///
    /// The file is not opened until the first write.
    ///
    /// # Parameters
    ///
    /// * `path` - Active trace file; backups are created next to it
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self::with_limits(path, ROTATE_AT_BYTES, KEEP_BACKUPS)
    }

    /// Creates a writer with explicit limits.
    ///
    /// # Parameters
    ///
    /// * `path` - Active trace file
    /// * `limit` - Size in bytes past which the next write rotates first
    /// * `keep` - Number of backups kept after a rotation
    #[must_use]
    pub const fn with_limits(path: PathBuf, limit: u64, keep: usize) -> Self {
        Self {
            path,
            limit,
            keep,
            active: Mutex::new(None),
        }
    }

    /// Path of the active file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` plus a newline, rotating first when the file is full.
    ///
    /// # Errors
    ///
    /// Opening, renaming or writing the file failed, or the lock is poisoned.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self
            .active
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("writer lock poisoned: {e}")))?;

        if guard.as_ref().is_some_and(|active| active.len > self.limit) {
            *guard = None;
            self.rotate()?;
        }

        if guard.is_none() {
            let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            let len = file.metadata()?.len();
            *guard = Some(Active { file, len });
        }

        let Some(active) = guard.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::Other, "trace file unavailable"));
        };
        writeln!(active.file, "{line}")?;
        active.file.flush()?;
        active.len += line.len() as u64 + 1;
        Ok(())
    }

    fn rotate(&self) -> io::Result<()> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3f");
        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".{stamp}"));
        fs::rename(&self.path, PathBuf::from(backup))?;
        self.prune()
    }

    /// Timestamp suffixes sort chronologically, so the oldest backups come
    /// first by name.
    fn prune(&self) -> io::Result<()> {
        let (Some(dir), Some(name)) = (self.path.parent(), self.path.file_name()) else {
            return Ok(());
        };
        let prefix = format!("{}.", name.to_string_lossy());

        let mut backups: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .map(|n| n.to_string_lossy().starts_with(&prefix))
                    .unwrap_or(false)
            })
            .collect();
        backups.sort();

        let excess = backups.len().saturating_sub(self.keep);
        for stale in &backups[..excess] {
            if let Err(e) = fs::remove_file(stale) {
                tracing::warn!(
                    backup = %stale.display(),
                    error = %e,
                    "failed to prune trace backup"
                );
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("limit", &self.limit)
            .field("keep", &self.keep)
            .finish_non_exhaustive()
    }
}
