//! Content hashing for incremental exports.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use xxhash_rust::xxh3::Xxh3;

/// Read buffer size used while hashing.
const CHUNK_SIZE: usize = 64 * 1024;

/// Content digest of a file.
#[derive(Debug, Clone, Copy)]
pub enum FileDigest {
    /// The file does not exist
    Absent,
    /// XXH3-128 of the whole file
    Hash(u128),
}

/// Two digests match only when both files exist and hash equal, so a
/// missing file can never satisfy an up-to-date check.
impl PartialEq for FileDigest {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FileDigest::Hash(a), FileDigest::Hash(b)) => a == b,
            _ => false,
        }
    }
}

/// Hash a file by streaming it through XXH3 in fixed-size chunks.
///
/// Symbolic links are followed. A missing file hashes to
/// [`FileDigest::Absent`]; any other I/O failure is returned.
pub fn digest_file(path: &Path) -> io::Result<FileDigest> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FileDigest::Absent),
        Err(e) => return Err(e),
    };

    let mut hasher = Xxh3::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(FileDigest::Hash(hasher.digest128()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_absent() {
        let temp = TempDir::new().unwrap();
        let digest = digest_file(&temp.path().join("nope.svg")).unwrap();
        assert!(matches!(digest, FileDigest::Absent));
        assert_ne!(digest, FileDigest::Absent);
    }

    #[test]
    fn test_equal_content_equal_digest() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.svg");
        let b = temp.path().join("b.svg");
        fs::write(&a, "<svg>same</svg>").unwrap();
        fs::write(&b, "<svg>same</svg>").unwrap();
        assert_eq!(digest_file(&a).unwrap(), digest_file(&b).unwrap());
    }

    #[test]
    fn test_different_content_different_digest() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.svg");
        let b = temp.path().join("b.svg");
        fs::write(&a, "<svg>one</svg>").unwrap();
        fs::write(&b, "<svg>two</svg>").unwrap();
        assert_ne!(digest_file(&a).unwrap(), digest_file(&b).unwrap());
    }

    #[test]
    fn test_streaming_matches_one_shot_across_chunks() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("big.svg");
        let data: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &data).unwrap();

        let expected = xxhash_rust::xxh3::xxh3_128(&data);
        assert_eq!(digest_file(&path).unwrap(), FileDigest::Hash(expected));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_followed() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target.svg");
        let link = temp.path().join("link.svg");
        fs::write(&target, "<svg/>").unwrap();
        std::os::unix::fs::symlink("target.svg", &link).unwrap();
        assert_eq!(digest_file(&link).unwrap(), digest_file(&target).unwrap());
    }
}
