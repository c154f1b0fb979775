//! Staging of `go get` targets
//!
//! `go get <package>` has no project of its own to inspect, so the fetched
//! module is copied out of the module cache into a temporary directory and
//! build-info is collected from there.

use crate::error::{GobiError, GobiResult};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Create the temporary staging directory
pub fn create() -> GobiResult<TempDir> {
    tempfile::Builder::new()
        .prefix("gobi-get-")
        .tempdir()
        .map_err(|e| GobiError::io("creating staging directory", e))
}

/// Remove the staging directory, keeping the first error.
///
/// A cleanup failure is only reported when `primary` succeeded.
pub fn finish<T>(staging: TempDir, primary: GobiResult<T>) -> GobiResult<T> {
    let path = staging.path().to_path_buf();
    let cleanup = staging
        .close()
        .map_err(|e| GobiError::io(format!("removing staging directory {}", path.display()), e));
    first_error(primary, cleanup)
}

fn first_error<T>(primary: GobiResult<T>, cleanup: GobiResult<()>) -> GobiResult<T> {
    let value = primary?;
    cleanup?;
    Ok(value)
}

/// Recursively copy the contents of `src` into `dst`
pub fn copy_dir(src: &Path, dst: &Path) -> GobiResult<()> {
    if !src.is_dir() {
        return Err(GobiError::PackageFiles(src.to_path_buf()));
    }

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).display().to_string();
            GobiError::io(format!("walking {}", path), e.into())
        })?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| GobiError::PackageFiles(entry.path().to_path_buf()))?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| GobiError::io(format!("creating {}", target.display()), e))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| GobiError::io(format!("creating {}", parent.display()), e))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| {
                GobiError::io(format!("copying {}", entry.path().display()), e)
            })?;
            // The module cache is read-only; go rewrites go.sum in the copy
            make_writable(&target)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn make_writable(path: &Path) -> GobiResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .map_err(|e| GobiError::io(format!("reading metadata of {}", path.display()), e))?
        .permissions();
    perms.set_mode(perms.mode() | 0o200);
    fs::set_permissions(path, perms)
        .map_err(|e| GobiError::io(format!("setting permissions of {}", path.display()), e))
}

#[cfg(not(unix))]
fn make_writable(path: &Path) -> GobiResult<()> {
    let mut perms = fs::metadata(path)
        .map_err(|e| GobiError::io(format!("reading metadata of {}", path.display()), e))?
        .permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    fs::set_permissions(path, perms)
        .map_err(|e| GobiError::io(format!("setting permissions of {}", path.display()), e))
}
