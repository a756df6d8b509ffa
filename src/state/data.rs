/// Shared data structures for the application state
///
/// The media tree produced by a scan (or a JSON load). It flows from the
/// scanner into the session, the selection state machine and the
/// persistence layer, and is serialized as-is.
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Image extensions accepted by the scanner (lowercase, no dot)
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Video extensions accepted by the scanner (lowercase, no dot)
pub const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "webm", "ogg"];

/// Kind of a leaf in the tree. Serialized as the node's `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Marker serialized as `"type": "folder"` on folder nodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderTag {
    #[default]
    Folder,
}

/// A directory that has at least one media file somewhere below it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Display name (last path component)
    pub name: String,
    /// Full filesystem path, unique within one scan
    pub path: String,
    #[serde(rename = "type", default)]
    pub tag: FolderTag,
    pub children: Vec<MediaNode>,
}

/// An image or video file with best-effort capture metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// File size in bytes
    pub size: u64,
    /// GPS latitude in decimal degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// GPS longitude in decimal degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Capture date as an ISO-8601 UTC timestamp
    #[serde(
        rename = "dateTaken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_taken: Option<String>,
}

/// Either a folder or a file. The `type` field inside each variant
/// discriminates them on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaNode {
    Folder(FolderNode),
    File(FileNode),
}

/// Metadata read from a single file. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaMetadata {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date_taken: Option<String>,
}

impl FolderNode {
    /// Create an empty folder node for a directory path
    pub fn new(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Self {
            name,
            path: path.to_string_lossy().to_string(),
            tag: FolderTag::Folder,
            children: Vec::new(),
        }
    }

    /// All files below this folder, depth-first in child order
    pub fn leaves(&self) -> Vec<&FileNode> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_leaves(&mut out);
        }
        out
    }
}

impl FileNode {
    /// Create a file node without metadata
    pub fn new(path: &Path, kind: MediaKind, size: u64) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            name,
            path: path.to_string_lossy().to_string(),
            kind,
            size,
            latitude: None,
            longitude: None,
            date_taken: None,
        }
    }

    /// Copy the fields that were found onto this node
    pub fn attach(&mut self, meta: MediaMetadata) {
        if meta.latitude.is_some() {
            self.latitude = meta.latitude;
        }
        if meta.longitude.is_some() {
            self.longitude = meta.longitude;
        }
        if meta.date_taken.is_some() {
            self.date_taken = meta.date_taken;
        }
    }
}

impl MediaNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::File(file) => &file.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.path,
            Self::File(file) => &file.path,
        }
    }

    #[cfg(test)]
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    /// Push every file at or below this node onto `out`
    pub fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a FileNode>) {
        match self {
            Self::Folder(folder) => {
                for child in &folder.children {
                    child.collect_leaves(out);
                }
            }
            Self::File(file) => out.push(file),
        }
    }
}

/// Classify a path by its extension (case-insensitive).
/// Returns `None` for anything outside the allowlist.
pub fn detect_media_kind(path: &Path) -> Option<MediaKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}
