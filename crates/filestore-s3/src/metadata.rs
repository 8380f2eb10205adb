//! Object metadata wire format
//!
//! Every stored object carries exactly four flat string pairs. All four
//! keys are written on every put, even when a value is empty, which is
//! what lets a read distinguish "object not found" (wholly empty map)
//! from "object with empty fields".

use std::collections::HashMap;

use filestore_core::StoredFile;

pub(crate) const METADATA_MIME_TYPE: &str = "mimeType";
pub(crate) const METADATA_SIZE: &str = "size";
pub(crate) const METADATA_TITLE: &str = "title";
pub(crate) const METADATA_ORIGIN: &str = "origin";

/// Typed view of the metadata pairs attached to a stored object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileMetadata {
    pub mime_type: String,
    pub size: u64,
    pub title: String,
    pub origin: String,
}

impl FileMetadata {
    /// Strict decode of a store metadata map. A wholly empty map decodes
    /// to `None` (absent object). Missing keys fill with defaults; a
    /// `size` that does not parse as a decimal byte count reads as 0.
    pub fn decode(map: &HashMap<String, String>) -> Option<Self> {
        if map.is_empty() {
            return None;
        }
        Some(Self {
            mime_type: map.get(METADATA_MIME_TYPE).cloned().unwrap_or_default(),
            size: map
                .get(METADATA_SIZE)
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            title: map.get(METADATA_TITLE).cloned().unwrap_or_default(),
            origin: map.get(METADATA_ORIGIN).cloned().unwrap_or_default(),
        })
    }

    /// Encode to the wire map, always writing all four keys.
    pub fn encode(&self) -> HashMap<String, String> {
        HashMap::from([
            (METADATA_MIME_TYPE.to_string(), self.mime_type.clone()),
            (METADATA_SIZE.to_string(), self.size.to_string()),
            (METADATA_TITLE.to_string(), self.title.clone()),
            (METADATA_ORIGIN.to_string(), self.origin.clone()),
        ])
    }

    /// Build the host-facing file record for `key`, without content.
    pub fn into_file(self, key: &str) -> StoredFile {
        StoredFile {
            key: key.to_string(),
            mime_type: self.mime_type,
            size: self.size,
            title: self.title,
            origin: self.origin,
            content: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_map_is_absent_object() {
        assert_eq!(FileMetadata::decode(&HashMap::new()), None);
    }

    #[test]
    fn test_partial_map_fills_defaults() {
        let map = HashMap::from([(METADATA_ORIGIN.to_string(), "s3".to_string())]);
        let meta = FileMetadata::decode(&map).expect("non-empty map decodes");
        assert_eq!(meta.origin, "s3");
        assert_eq!(meta.mime_type, "");
        assert_eq!(meta.title, "");
        assert_eq!(meta.size, 0);
    }

    #[test]
    fn test_invalid_size_reads_as_zero() {
        let map = HashMap::from([
            (METADATA_SIZE.to_string(), "abc".to_string()),
            (METADATA_TITLE.to_string(), "report.pdf".to_string()),
        ]);
        assert_eq!(FileMetadata::decode(&map).unwrap().size, 0);

        let map = HashMap::from([(METADATA_SIZE.to_string(), "-12".to_string())]);
        assert_eq!(FileMetadata::decode(&map).unwrap().size, 0);
    }

    #[test]
    fn test_encode_always_writes_all_four_keys() {
        let meta = FileMetadata {
            mime_type: String::new(),
            size: 0,
            title: String::new(),
            origin: "s3".to_string(),
        };
        let map = meta.encode();
        assert_eq!(map.len(), 4);
        assert_eq!(map.get(METADATA_MIME_TYPE), Some(&String::new()));
        assert_eq!(map.get(METADATA_SIZE), Some(&"0".to_string()));
        assert_eq!(map.get(METADATA_TITLE), Some(&String::new()));
        assert_eq!(map.get(METADATA_ORIGIN), Some(&"s3".to_string()));
    }

    #[test]
    fn test_round_trip() {
        let meta = FileMetadata {
            mime_type: "image/png".to_string(),
            size: 2048,
            title: "avatar.png".to_string(),
            origin: "minio".to_string(),
        };
        assert_eq!(FileMetadata::decode(&meta.encode()), Some(meta));
    }

    #[test]
    fn test_into_file_carries_no_content() {
        let meta = FileMetadata {
            mime_type: "text/plain".to_string(),
            size: 5,
            title: "a.txt".to_string(),
            origin: "s3".to_string(),
        };
        let file = meta.into_file("2024/5/a.txt");
        assert_eq!(file.key, "2024/5/a.txt");
        assert_eq!(file.size, 5);
        assert!(file.content.is_none());
    }
}
