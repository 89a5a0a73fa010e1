//! Common types used throughout MediaStow.

use serde::{Deserialize, Serialize};

/// Descriptor of an incoming upload.
///
/// Constructed by the host framework before a store or delete call. The
/// `name` field is only consulted for namespace extraction; the on-disk
/// file name is composed from `hash` and `ext` alone, so two uploads with
/// the same hash, extension and namespace land on the same path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    name: String,
    hash: String,
    ext: String,
    size: u64,
}

impl FileInfo {
    /// Create a new upload descriptor.
    ///
    /// # Preconditions
    /// - `hash` must be non-empty
    /// - `hash` and `ext` must not contain path separators
    /// - the composed file name must not be `.` or `..`
    ///
    /// # Postconditions
    /// - Returns a descriptor whose composed file name is a single path
    ///   component
    ///
    /// # Errors
    /// - Returns error if any field is invalid
    pub fn new(
        name: impl Into<String>,
        hash: impl Into<String>,
        ext: impl Into<String>,
        size: u64,
    ) -> crate::Result<Self> {
        let name = name.into();
        let hash = hash.into();
        let ext = ext.into();

        if hash.is_empty() {
            return Err(crate::Error::InvalidInput(
                "File hash cannot be empty".to_string(),
            ));
        }
        if hash.contains('/') || hash.contains('\\') {
            return Err(crate::Error::InvalidInput(
                "File hash cannot contain path separators".to_string(),
            ));
        }
        if ext.contains('/') || ext.contains('\\') {
            return Err(crate::Error::InvalidInput(
                "File extension cannot contain path separators".to_string(),
            ));
        }
        let file_name = format!("{}{}", hash, ext);
        if file_name == "." || file_name == ".." {
            return Err(crate::Error::InvalidInput(
                "File name cannot be a directory reference".to_string(),
            ));
        }

        Ok(Self {
            name,
            hash,
            ext,
            size,
        })
    }

    /// Original, user-supplied file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable identifier used as the on-disk file stem.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// File extension, including the leading separator.
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// Declared payload size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// On-disk file name: the hash followed by the extension.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.hash, self.ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_info_creation() {
        let file = FileInfo::new("photo.png", "abc123", ".png", 42).unwrap();
        assert_eq!(file.name(), "photo.png");
        assert_eq!(file.hash(), "abc123");
        assert_eq!(file.ext(), ".png");
        assert_eq!(file.size(), 42);
    }

    #[test]
    fn test_file_name_composition() {
        let file = FileInfo::new("photo.png", "abc123", ".png", 0).unwrap();
        assert_eq!(file.file_name(), "abc123.png");

        let bare = FileInfo::new("notes", "abc123", "", 0).unwrap();
        assert_eq!(bare.file_name(), "abc123");
    }

    #[test]
    fn test_empty_hash_fails() {
        assert!(FileInfo::new("photo.png", "", ".png", 0).is_err());
    }

    #[test]
    fn test_separators_rejected() {
        assert!(FileInfo::new("photo.png", "../abc", ".png", 0).is_err());
        assert!(FileInfo::new("photo.png", "abc", ".png/x", 0).is_err());
        assert!(FileInfo::new("photo.png", "a\\b", ".png", 0).is_err());
    }

    #[test]
    fn test_directory_references_rejected() {
        assert!(FileInfo::new("photo.png", ".", "", 0).is_err());
        assert!(FileInfo::new("photo.png", "..", "", 0).is_err());
        // A hash of ".." with an extension composes into a plain file name.
        assert!(FileInfo::new("photo.png", "..", ".png", 0).is_ok());
    }
}
