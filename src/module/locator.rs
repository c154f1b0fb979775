//! Module archive lookup in the download cache
//!
//! Archives live at `<cache_root>/<encoded module path>/@v/<version>.zip`.
//! Depending on the Go version the download cache sits one level deeper or
//! shallower, so a miss under the cache root is retried once under its
//! parent directory.

use crate::build_info::BuildContext;
use crate::error::{GobiError, GobiResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Find the archive of an encoded `name:version` identifier.
///
/// Returns `Ok(None)` when no archive exists under the cache root or its
/// parent, or when the identifier is malformed. Only filesystem errors are
/// reported as errors.
pub fn locate(
    ctx: &BuildContext,
    cache_root: &Path,
    encoded_id: &str,
) -> GobiResult<Option<PathBuf>> {
    if let Some(path) = archive_if_exists(ctx, cache_root, encoded_id)? {
        return Ok(Some(path));
    }

    match cache_root.parent() {
        Some(parent) => archive_if_exists(ctx, parent, encoded_id),
        None => Ok(None),
    }
}

fn archive_if_exists(
    ctx: &BuildContext,
    cache_root: &Path,
    encoded_id: &str,
) -> GobiResult<Option<PathBuf>> {
    let parts: Vec<&str> = encoded_id.split(':').collect();
    let [name, version] = parts.as_slice() else {
        debug!(
            parent: ctx.span(),
            "The encoded dependency id syntax should be 'name:version' but instead got: {}",
            encoded_id
        );
        return Ok(None);
    };

    let zip_path = cache_root.join(name).join("@v").join(format!("{}.zip", version));
    let exists = zip_path
        .try_exists()
        .map_err(|e| GobiError::ArchiveLookup {
            name: (*name).to_string(),
            path: zip_path.clone(),
            source: e,
        })?;

    if !exists || !zip_path.is_file() {
        debug!(parent: ctx.span(), "The following file is missing: {}", zip_path.display());
        return Ok(None);
    }

    Ok(Some(zip_path))
}
