/// User interface module
///
/// This module handles:
/// - Folder tree panel (tree.rs)
/// - Thumbnail grid, pagination and viewer pane (gallery.rs)
/// - Native open/save dialogs (dialogs.rs)

pub mod dialogs;
pub mod gallery;
pub mod tree;
