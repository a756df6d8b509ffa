/// Flat JSON snapshot of a folder tree
///
/// The document mirrors `MediaNode` exactly: pretty-printed with two-space
/// indentation, optional fields omitted when absent, unknown fields ignored
/// on load. Paths come from the native dialogs in the shell.
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::data::FolderNode;
use crate::error::{BrowserError, Result};

/// Serialize a tree to pretty JSON text
pub fn serialize(tree: &FolderNode) -> Result<String> {
    Ok(serde_json::to_string_pretty(tree)?)
}

/// Parse a tree from JSON text. No schema validation beyond the shape.
///
/// Nesting depth is unbounded: every tree a scan can produce loads back.
/// The stack grows on demand instead of overflowing on deep trees.
pub fn deserialize(text: &str) -> Result<FolderNode> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let tree = FolderNode::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(tree)
}

/// Write the current tree to `path`. Fails with `NoTree` when nothing is loaded.
pub fn save_tree(path: &Path, tree: Option<&FolderNode>) -> Result<()> {
    let tree = tree.ok_or(BrowserError::NoTree)?;
    let json = serialize(tree)?;
    fs::write(path, json).map_err(|e| BrowserError::io(path, e))?;

    log::info!("Saved folder structure to {}", path.display());
    Ok(())
}

/// Read a tree from `path`
pub fn load_tree(path: &Path) -> Result<FolderNode> {
    let text = fs::read_to_string(path).map_err(|e| BrowserError::io(path, e))?;
    let tree = deserialize(&text)?;

    log::info!("Loaded folder structure from {}", path.display());
    Ok(tree)
}
