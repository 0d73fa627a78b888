// skew-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::Path;

/// Write content to a file atomically using a temporary file.
///
/// The temporary file lives next to the target so the final rename stays on
/// one filesystem. A reader sees either the previous file or the complete new
/// one, never a partial artifact. Every failure is reported as a
/// `WriteFailure` naming the target path.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let failure = |source: std::io::Error| InfrastructureError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(failure)?;
    temp_file.write_all(content.as_ref()).map_err(failure)?;
    temp_file.persist(path).map_err(|e| failure(e.error))?;

    Ok(())
}
