/// Folder scanner: builds the media tree for a directory
///
/// The walk is depth-first in directory-listing order. Only allowlisted
/// extensions are kept, folders without any media below them are pruned,
/// and a directory that cannot be read is logged and dropped without
/// stopping the scan. Metadata is attached file by file afterwards.
use std::path::Path;

use tokio::task;
use walkdir::WalkDir;

use super::metadata::MetadataReader;
use crate::state::data::{detect_media_kind, FileNode, FolderNode, MediaNode};

/// Counts logged at the end of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Folders kept below the root
    pub folders: usize,
    pub files: usize,
    /// Entries that could not be read
    pub skipped: usize,
}

/// Scan `root` and return its media tree with metadata attached.
/// The root itself is always returned, even when it ends up empty.
pub async fn scan<R>(root: &Path, reader: &R, follow_links: bool) -> FolderNode
where
    R: MetadataReader + Sync,
{
    log::info!("Scanning folder: {}", root.display());

    let owned = root.to_path_buf();
    let walk = task::spawn_blocking(move || build_skeleton(&owned, follow_links)).await;
    let (mut tree, summary) = match walk {
        Ok(result) => result,
        Err(e) => {
            log::error!("Scan of {} aborted: {}", root.display(), e);
            return FolderNode::new(root);
        }
    };

    for file in files_mut(&mut tree) {
        let meta = reader.read(Path::new(&file.path), file.kind).await;
        file.attach(meta);
    }

    log::info!(
        "Scan complete: {} folders, {} files, {} unreadable entries",
        summary.folders,
        summary.files,
        summary.skipped
    );
    tree
}

/// Walk `root` and build the pruned tree without metadata. Blocking.
pub fn build_skeleton(root: &Path, follow_links: bool) -> (FolderNode, ScanSummary) {
    let mut summary = ScanSummary::default();
    // stack[d] is the open folder at depth d
    let mut stack = vec![FolderNode::new(root)];

    for entry in WalkDir::new(root).follow_links(follow_links).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Error reading dir: {}", e);
                summary.skipped += 1;
                continue;
            }
        };

        while stack.len() > entry.depth() {
            close_folder(&mut stack, &mut summary);
        }

        if entry.file_type().is_dir() {
            stack.push(FolderNode::new(entry.path()));
            continue;
        }

        let Some(kind) = detect_media_kind(entry.path()) else {
            continue;
        };
        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                log::warn!("Could not stat {}: {}", entry.path().display(), e);
                summary.skipped += 1;
                continue;
            }
        };

        if let Some(parent) = stack.last_mut() {
            parent
                .children
                .push(MediaNode::File(FileNode::new(entry.path(), kind, size)));
            summary.files += 1;
        }
    }

    while stack.len() > 1 {
        close_folder(&mut stack, &mut summary);
    }
    let tree = stack.pop().unwrap_or_else(|| FolderNode::new(root));
    (tree, summary)
}

// Pop the innermost open folder and hand it to its parent unless empty.
fn close_folder(stack: &mut Vec<FolderNode>, summary: &mut ScanSummary) {
    let Some(folder) = stack.pop() else {
        return;
    };
    if folder.children.is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        summary.folders += 1;
        parent.children.push(MediaNode::Folder(folder));
    }
}

fn files_mut(folder: &mut FolderNode) -> Vec<&mut FileNode> {
    let mut out = Vec::new();
    collect_files_mut(&mut folder.children, &mut out);
    out
}

fn collect_files_mut<'a>(children: &'a mut [MediaNode], out: &mut Vec<&'a mut FileNode>) {
    for child in children {
        match child {
            MediaNode::Folder(folder) => collect_files_mut(&mut folder.children, out),
            MediaNode::File(file) => out.push(file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{MediaKind, MediaMetadata, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
    use std::fs;
    use std::future::Future;

    /// Videos get a fixed position, images nothing
    struct StubReader;

    impl MetadataReader for StubReader {
        fn read(&self, _path: &Path, kind: MediaKind) -> impl Future<Output = MediaMetadata> + Send {
            async move {
                match kind {
                    MediaKind::Video => MediaMetadata {
                        latitude: Some(52.52),
                        longitude: Some(13.405),
                        date_taken: None,
                    },
                    MediaKind::Image => MediaMetadata::default(),
                }
            }
        }
    }

    fn child<'a>(folder: &'a FolderNode, name: &str) -> Option<&'a MediaNode> {
        folder.children.iter().find(|c| c.name() == name)
    }

    fn assert_well_formed(folder: &FolderNode) {
        for node in &folder.children {
            match node {
                MediaNode::Folder(sub) => {
                    assert!(!sub.children.is_empty(), "empty folder {}", sub.path);
                    assert_well_formed(sub);
                }
                MediaNode::File(file) => {
                    let ext = Path::new(&file.path)
                        .extension()
                        .unwrap()
                        .to_string_lossy()
                        .to_lowercase();
                    assert!(
                        IMAGE_EXTENSIONS.contains(&ext.as_str())
                            || VIDEO_EXTENSIONS.contains(&ext.as_str()),
                        "unexpected file {}",
                        file.path
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn test_scan_example_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jpg"), b"no exif here").unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/c.mp4"), b"1234").unwrap();
        fs::write(dir.path().join("b/readme.txt"), b"hello").unwrap();

        let tree = scan(dir.path(), &StubReader, true).await;
        assert_eq!(tree.path, dir.path().to_string_lossy());
        assert_eq!(tree.children.len(), 2);

        match child(&tree, "a.jpg") {
            Some(MediaNode::File(a)) => {
                assert_eq!(a.kind, MediaKind::Image);
                assert_eq!(a.size, 12);
                assert_eq!((a.latitude, a.longitude, &a.date_taken), (None, None, &None));
            }
            other => panic!("a.jpg missing: {other:?}"),
        }

        let Some(MediaNode::Folder(b)) = child(&tree, "b") else {
            panic!("folder b missing");
        };
        assert_eq!(b.children.len(), 1);
        match &b.children[0] {
            MediaNode::File(c) => {
                assert_eq!(c.name, "c.mp4");
                assert_eq!(c.kind, MediaKind::Video);
                assert_eq!(c.size, 4);
                assert_eq!(c.latitude, Some(52.52));
                assert_eq!(c.longitude, Some(13.405));
            }
            other => panic!("expected c.mp4, got {other:?}"),
        }

        let json = crate::state::persist::serialize(&tree).unwrap();
        assert!(!json.contains("readme.txt"));
    }

    #[test]
    fn test_empty_branches_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("empty/deeper/deepest")).unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/notes.txt"), b"x").unwrap();
        fs::create_dir_all(dir.path().join("keep/mid/leaf")).unwrap();
        fs::write(dir.path().join("keep/mid/leaf/clip.WEBM"), b"x").unwrap();
        fs::write(dir.path().join("keep/Photo.JPEG"), b"x").unwrap();

        let (tree, summary) = build_skeleton(dir.path(), true);
        assert_well_formed(&tree);
        assert_eq!(tree.children.len(), 1);
        assert!(child(&tree, "keep").is_some());
        assert_eq!(summary.files, 2);
        assert_eq!(summary.folders, 3);

        let leaves: Vec<&str> = tree.leaves().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(leaves.len(), 2);
        assert!(leaves.contains(&"clip.WEBM"));
        assert!(leaves.contains(&"Photo.JPEG"));
    }

    #[test]
    fn test_nothing_to_show_keeps_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let (tree, summary) = build_skeleton(dir.path(), true);
        assert!(tree.children.is_empty());
        assert_eq!(summary, ScanSummary::default());
    }

    #[tokio::test]
    async fn test_missing_root_yields_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let tree = scan(&missing, &StubReader, true).await;
        assert_eq!(tree.name, "gone");
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_siblings_after_deep_folder_land_in_the_right_parent() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("x/y")).unwrap();
        fs::write(dir.path().join("x/y/1.png"), b"x").unwrap();
        fs::write(dir.path().join("x/2.gif"), b"x").unwrap();
        fs::write(dir.path().join("3.ogg"), b"x").unwrap();

        let (tree, _) = build_skeleton(dir.path(), true);
        assert_eq!(tree.children.len(), 2);
        assert!(matches!(child(&tree, "3.ogg"), Some(MediaNode::File(_))));

        let Some(MediaNode::Folder(x)) = child(&tree, "x") else {
            panic!("folder x missing");
        };
        assert_eq!(x.children.len(), 2);
        assert!(matches!(child(x, "2.gif"), Some(MediaNode::File(_))));
        let Some(MediaNode::Folder(y)) = child(x, "y") else {
            panic!("folder y missing");
        };
        assert_eq!(y.children.len(), 1);
        assert_eq!(y.children[0].path(), dir.path().join("x/y/1.png").to_string_lossy());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subtree_is_dropped_and_walk_continues() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("keep")).unwrap();
        fs::write(dir.path().join("keep/a.jpg"), b"x").unwrap();
        fs::create_dir_all(dir.path().join("later")).unwrap();
        fs::write(dir.path().join("later/b.gif"), b"x").unwrap();
        fs::write(dir.path().join("z.png"), b"x").unwrap();
        // Following this link loops back to the root and errors out
        fs::create_dir_all(dir.path().join("broken")).unwrap();
        std::os::unix::fs::symlink("..", dir.path().join("broken/loop")).unwrap();

        let (tree, summary) = build_skeleton(dir.path(), true);

        assert!(summary.skipped >= 1);
        assert_eq!(summary.files, 3);
        assert!(child(&tree, "broken").is_none());
        assert!(matches!(child(&tree, "keep"), Some(MediaNode::Folder(_))));
        assert!(matches!(child(&tree, "later"), Some(MediaNode::Folder(_))));
        assert!(matches!(child(&tree, "z.png"), Some(MediaNode::File(_))));
        assert_eq!(tree.leaves().len(), 3);
        assert_well_formed(&tree);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_scan_with_tag_reader() {
        use crate::media::metadata::TagReader;
        use std::os::unix::fs::PermissionsExt;
        use std::time::Duration;

        let tools = tempfile::tempdir().unwrap();
        let tool = tools.path().join("exiftool");
        fs::write(
            &tool,
            "#!/bin/sh\necho '[{\"GPSLatitude\": 40.6892, \"GPSLongitude\": \"-74.0445\"}]'\n",
        )
        .unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jpg"), b"no exif here").unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/c.mp4"), b"1234").unwrap();
        fs::write(dir.path().join("b/readme.txt"), b"hello").unwrap();

        let reader = TagReader {
            exiftool: tool,
            timeout: Duration::from_secs(5),
        };
        let tree = scan(dir.path(), &reader, true).await;

        let Some(MediaNode::File(a)) = child(&tree, "a.jpg") else {
            panic!("a.jpg missing");
        };
        assert_eq!(a.latitude, None);
        assert_eq!(a.date_taken, None);

        let Some(MediaNode::Folder(b)) = child(&tree, "b") else {
            panic!("folder b missing");
        };
        assert_eq!(b.children.len(), 1);
        let MediaNode::File(c) = &b.children[0] else {
            panic!("expected a file");
        };
        assert_eq!(c.latitude, Some(40.6892));
        assert_eq!(c.longitude, Some(-74.0445));
    }
}
