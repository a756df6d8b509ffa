/// Media scanning module
///
/// This module handles:
/// - Walking a folder into a pruned media tree (scanner.rs)
/// - Reading GPS and capture dates (metadata.rs)
/// - EXIF tags for images (image_tags.rs)
/// - External tag tool for videos (video_tags.rs)

pub mod image_tags;
pub mod metadata;
pub mod scanner;
pub mod video_tags;
