//! Archive checksums
//!
//! Computes the md5 / sha1 / sha256 triple recorded for every dependency
//! archive and artifact. The file is streamed once through all three
//! hashers.

use crate::build_info::{Artifact, Checksum, Dependency, ZIP_DEPENDENCY_TYPE};
use crate::error::{GobiError, GobiResult};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Compute the checksum triple of a file
pub fn file_checksums(path: &Path) -> GobiResult<Checksum> {
    let mut file = File::open(path)
        .map_err(|e| GobiError::io(format!("opening {}", path.display()), e))?;

    let mut md5 = Md5::new();
    let mut sha1 = Sha1::new();
    let mut sha256 = Sha256::new();

    let mut buf = [0u8; 8192];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| GobiError::io(format!("reading {}", path.display()), e))?;
        if n == 0 {
            break;
        }
        md5.update(&buf[..n]);
        sha1.update(&buf[..n]);
        sha256.update(&buf[..n]);
    }

    Ok(Checksum {
        sha1: hex::encode(sha1.finalize()),
        md5: hex::encode(md5.finalize()),
        sha256: hex::encode(sha256.finalize()),
    })
}

/// Build a zip dependency record for `id` from its cached archive
pub fn enrich(id: &str, archive: &Path) -> GobiResult<Dependency> {
    let checksum = file_checksums(archive)?;
    Ok(Dependency {
        id: id.to_string(),
        kind: ZIP_DEPENDENCY_TYPE.to_string(),
        checksum,
        requested_by: vec![],
    })
}

/// Build an artifact record for a file produced by the build.
///
/// The artifact type is the file extension, if any.
pub fn artifact(path: &Path) -> GobiResult<Artifact> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| GobiError::PathNotFound(path.to_path_buf()))?;
    let kind = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Artifact {
        name,
        kind,
        path: path.display().to_string(),
        checksum: file_checksums(path)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn known_digests() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hello.zip");
        fs::write(&path, b"hello").unwrap();

        let checksum = file_checksums(&path).unwrap();
        assert_eq!(checksum.md5, "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(checksum.sha1, "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
        assert_eq!(
            checksum.sha256,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn checksums_are_deterministic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mod.zip");
        let content: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &content).unwrap();

        assert_eq!(file_checksums(&path).unwrap(), file_checksums(&path).unwrap());
    }

    #[test]
    fn enrich_builds_zip_dependency() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v1.0.0.zip");
        fs::write(&path, b"archive").unwrap();

        let dep = enrich("example.com/lib:v1.0.0", &path).unwrap();
        assert_eq!(dep.id, "example.com/lib:v1.0.0");
        assert_eq!(dep.kind, "zip");
        assert!(!dep.checksum.md5.is_empty());
        assert!(!dep.checksum.sha1.is_empty());
        assert!(!dep.checksum.sha256.is_empty());
        assert!(dep.requested_by.is_empty());
    }

    #[test]
    fn artifact_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.tar.gz");
        fs::write(&path, b"hello").unwrap();

        let artifact = artifact(&path).unwrap();
        assert_eq!(artifact.name, "app.tar.gz");
        assert_eq!(artifact.kind, "gz");
        assert_eq!(artifact.checksum.md5, "5d41402abc4b2a76b9719d911017c592");
    }

    #[test]
    fn unreadable_archive_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = enrich("x:v1", &dir.path().join("missing.zip")).unwrap_err();
        assert!(matches!(err, GobiError::Io { .. }));
    }
}
