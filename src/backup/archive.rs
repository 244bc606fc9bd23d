//! Backup archive construction and extraction.
//!
//! Archives are plain ZIP containers with two recognized path groups:
//! `databases/<name>` for SQLite files and `files/<relative-path>` for the
//! file-storage tree (images land under `files/images/...`). There is no
//! manifest; extraction ignores unrecognized groups so newer archives stay
//! readable by older code.

use crate::constants::{
    ARCHIVE_GROUP_DATABASES, ARCHIVE_GROUP_FILES, DB_AUX_SUFFIXES, DB_FILE_SUFFIXES,
    IMAGES_SUBDIR,
};
use crate::errors::BackupError;
use crate::fsutil;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Counts of what went into a freshly built archive.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveSummary {
    /// Database files written under `databases/`.
    pub databases: usize,
    /// Storage files written under `files/`.
    pub files: usize,
}

/// Counts of what an extraction applied and skipped.
#[derive(Debug, Clone, Copy)]
pub struct ExtractSummary {
    /// Database files replaced.
    pub databases: usize,
    /// Storage files replaced.
    pub files: usize,
    /// Entries ignored: unknown groups and unsafe paths.
    pub skipped: usize,
}

/// Whether a database-directory file name belongs in a backup.
///
/// Matches `.db` and `.sqlite` plus the `-wal`/`-shm`/`-journal` side files,
/// case-insensitively. Over-inclusive on purpose: auxiliary files must
/// travel with the main database so a restore sees a consistent snapshot
/// even when the write-ahead log holds uncommitted pages.
pub fn is_database_artifact(name: &str) -> bool {
    let lower = name.to_lowercase();
    DB_FILE_SUFFIXES
        .iter()
        .chain(DB_AUX_SUFFIXES.iter())
        .any(|suffix| lower.ends_with(suffix))
}

/// Builds a backup archive at `dest` from the local state.
///
/// Database files are taken from the top level of `db_dir` (selection per
/// [`is_database_artifact`]); the image tree under `<files_dir>/images` is
/// walked recursively. A missing image directory is skipped, not an error.
/// Archive paths always use forward slashes.
///
/// # Errors
///
/// Returns an error if any source file cannot be read or the archive cannot
/// be written.
pub fn build_archive(
    db_dir: &Path,
    files_dir: &Path,
    dest: &Path,
) -> Result<ArchiveSummary, BackupError> {
    debug!("Building backup archive at {:?}", dest);

    let out = File::create(dest)?;
    let mut zip = ZipWriter::new(BufWriter::new(out));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut summary = ArchiveSummary {
        databases: 0,
        files: 0,
    };

    if db_dir.exists() {
        let mut names: Vec<(PathBuf, String)> = Vec::new();
        for entry in fs::read_dir(db_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_database_artifact(&name) {
                names.push((entry.path(), name));
            }
        }
        // Deterministic entry order.
        names.sort_by(|a, b| a.1.cmp(&b.1));

        for (path, name) in names {
            append_file(&mut zip, &path, &format!("{ARCHIVE_GROUP_DATABASES}{name}"), options)?;
            summary.databases += 1;
        }
    }

    let images_dir = files_dir.join(IMAGES_SUBDIR);
    if images_dir.exists() {
        for entry in WalkDir::new(&images_dir)
            .sort_by_file_name()
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(&images_dir)
                .map_err(|e| BackupError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
            let zip_path = format!(
                "{}{}/{}",
                ARCHIVE_GROUP_FILES,
                IMAGES_SUBDIR,
                forward_slashes(rel)
            );
            append_file(&mut zip, entry.path(), &zip_path, options)?;
            summary.files += 1;
        }
    }

    zip.finish()?;
    debug!(
        "Archive complete: {} database files, {} storage files",
        summary.databases, summary.files
    );
    Ok(summary)
}

fn append_file(
    zip: &mut ZipWriter<BufWriter<File>>,
    source: &Path,
    zip_path: &str,
    options: SimpleFileOptions,
) -> Result<(), BackupError> {
    zip.start_file(zip_path, options)?;
    let mut reader = BufReader::new(File::open(source)?);
    io::copy(&mut reader, zip)?;
    debug!("Archived {:?} as {}", source, zip_path);
    Ok(())
}

fn forward_slashes(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Extracts a backup archive into the local state directories.
///
/// Entries under `databases/` must carry a bare file name and land in
/// `db_dir`; entries under `files/` land at their relative path below
/// `files_dir`. Anything else is ignored so unknown future entry groups do
/// not abort a restore. Unsafe remainders (empty, traversal components) are
/// skipped and counted. Every destination write goes through the atomic
/// replace primitive, so an interrupted extraction never leaves a partial
/// file under its final name.
///
/// # Errors
///
/// Returns [`BackupError::Archive`] when the container itself cannot be
/// opened or read, and [`BackupError::Io`] when a destination write fails.
pub fn extract_archive(
    archive_path: &Path,
    db_dir: &Path,
    files_dir: &Path,
) -> Result<ExtractSummary, BackupError> {
    debug!("Extracting backup archive {:?}", archive_path);

    let mut archive = ZipArchive::new(BufReader::new(File::open(archive_path)?))?;
    let mut summary = ExtractSummary {
        databases: 0,
        files: 0,
        skipped: 0,
    };

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();

        if let Some(bare) = name.strip_prefix(ARCHIVE_GROUP_DATABASES) {
            if bare.is_empty() || bare.contains('/') {
                warn!("Skipping unsafe database entry {:?}", name);
                summary.skipped += 1;
                continue;
            }
            fsutil::replace_file_atomic(&db_dir.join(bare), &mut entry)?;
            summary.databases += 1;
        } else if let Some(rel) = name.strip_prefix(ARCHIVE_GROUP_FILES) {
            match sanitize_relative(rel) {
                Some(rel_path) => {
                    fsutil::replace_file_atomic(&files_dir.join(rel_path), &mut entry)?;
                    summary.files += 1;
                }
                None => {
                    warn!("Skipping unsafe file entry {:?}", name);
                    summary.skipped += 1;
                }
            }
        } else {
            debug!("Ignoring unrecognized archive entry {:?}", name);
            summary.skipped += 1;
        }
    }

    debug!(
        "Extraction complete: {} database files, {} storage files, {} skipped",
        summary.databases, summary.files, summary.skipped
    );
    Ok(summary)
}

/// Validates an archive-relative path and rebuilds it as a native path.
///
/// Rejects empty paths and any traversal component, so a crafted archive
/// cannot write outside the destination root.
fn sanitize_relative(rel: &str) -> Option<PathBuf> {
    if rel.is_empty() {
        return None;
    }
    let mut out = PathBuf::new();
    for component in rel.split('/') {
        if component.is_empty() || component == "." || component == ".." {
            return None;
        }
        out.push(component);
    }
    Some(out)
}
