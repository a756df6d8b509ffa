/// State management module
///
/// This module handles all application state, including:
/// - The media tree data model (data.rs)
/// - JSON snapshot and restore of the tree (persist.rs)
/// - Tree selection and flattening (selection.rs)
/// - Gallery pagination (gallery.rs)
/// - The session that owns the current tree (session.rs)
/// - Open media viewers (viewers.rs)

pub mod data;
pub mod gallery;
pub mod persist;
pub mod selection;
pub mod session;
pub mod viewers;
