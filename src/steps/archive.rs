//! Archive builder - packages named byte sources into a jar-style container

use crate::steps::{display_path, StepError};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::ZipWriter;

/// One named entry to write into an archive
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Entry name inside the archive
    pub name: String,

    /// File whose contents become the entry
    pub source: std::path::PathBuf,
}

impl ArchiveEntry {
    /// Entry named after the source file's base name
    pub fn from_path(source: &Path) -> Self {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            source: source.to_path_buf(),
        }
    }
}

/// Build an archive from an ordered sequence of entries.
///
/// Entries are written in the order supplied, each fully read and closed
/// before the next. On any error the partial output file is removed; no
/// partial archive is left behind.
pub fn build(archive_path: &Path, entries: &[ArchiveEntry]) -> Result<(), StepError> {
    match write_archive(archive_path, entries) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(archive_path);
            Err(e)
        }
    }
}

/// Build an archive from every file under `dir`.
///
/// Entry names are `/`-separated paths relative to `dir`, in a deterministic
/// per-directory sorted order. Used to package the compiled classes tree.
pub fn build_from_dir(archive_path: &Path, dir: &Path) -> Result<(), StepError> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            StepError::io(
                format!("walking {}", display_path(dir)),
                e.into_io_error()
                    .unwrap_or_else(|| io::Error::other("walk error")),
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or_else(|_| entry.path());
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        entries.push(ArchiveEntry {
            name,
            source: entry.path().to_path_buf(),
        });
    }

    build(archive_path, &entries)
}

fn write_archive(archive_path: &Path, entries: &[ArchiveEntry]) -> Result<(), StepError> {
    let file = File::create(archive_path)
        .map_err(|e| StepError::io(format!("creating {}", display_path(archive_path)), e))?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default();

    for entry in entries {
        debug!("Adding {} from {}", entry.name, display_path(&entry.source));
        writer.start_file(&entry.name, options)?;
        let mut source = File::open(&entry.source)
            .map_err(|e| StepError::io(format!("reading {}", display_path(&entry.source)), e))?;
        io::copy(&mut source, &mut writer)
            .map_err(|e| StepError::io(format!("writing entry {}", entry.name), e))?;
    }

    writer.finish()?;
    Ok(())
}
