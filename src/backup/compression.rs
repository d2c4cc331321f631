use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{OpsError, Result};

pub const GZIP_EXTENSION: &str = "gz";

/// Gzip `path` into `<path>.gz` and remove the plain file, like `gzip <file>`.
/// On failure the plain file is kept and no partial archive is left behind.
pub fn compress_file(path: &Path) -> Result<PathBuf> {
    let mut target = path.as_os_str().to_owned();
    target.push(".");
    target.push(GZIP_EXTENSION);
    let target = PathBuf::from(target);

    let mut input = BufReader::new(File::open(path)?);
    write_or_discard(&target, |output| {
        let mut encoder = GzEncoder::new(BufWriter::new(output), Compression::default());
        io::copy(&mut input, &mut encoder)?;
        encoder.finish()?.flush()
    })?;

    fs::remove_file(path)?;
    debug!("Compressed {:?} -> {:?}", path, target);
    Ok(target)
}

/// Expand `<name>.gz` next to itself as `<name>`; the archive is kept.
pub fn decompress_file(path: &Path) -> Result<PathBuf> {
    let target = decompressed_path(path).ok_or_else(|| {
        OpsError::Restore(format!("{:?} is not a .{} file", path, GZIP_EXTENSION))
    })?;

    let mut decoder = GzDecoder::new(BufReader::new(File::open(path)?));
    write_or_discard(&target, |output| {
        let mut output = BufWriter::new(output);
        io::copy(&mut decoder, &mut output)?;
        output.flush()
    })
    .map_err(|e| OpsError::Restore(format!("Failed to decompress {:?}: {}", path, e)))?;

    debug!("Decompressed {:?} -> {:?}", path, target);
    Ok(target)
}

/// Create `target` and fill it with `write`. A target left half-written by a
/// failed `write` is removed.
fn write_or_discard<F>(target: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> io::Result<()>,
{
    let file = File::create(target)?;
    if let Err(e) = write(file) {
        if let Err(remove_err) = fs::remove_file(target) {
            warn!("Failed to remove partial {:?}: {}", target, remove_err);
        }
        return Err(e.into());
    }
    Ok(())
}

pub fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(GZIP_EXTENSION)
}

fn decompressed_path(path: &Path) -> Option<PathBuf> {
    if is_gzip(path) {
        Some(path.with_extension(""))
    } else {
        None
    }
}
