/// The browsing session: the one place that owns the current tree
///
/// Created at launch, replaced wholesale on every scan or load. Selection
/// and gallery state are derived from the tree and reset with it.
use std::path::PathBuf;

use super::data::FolderNode;
use super::gallery::Gallery;
use super::selection::{ClickModifiers, Selection};

#[derive(Debug, Default)]
pub struct Session {
    tree: Option<FolderNode>,
    /// Directory the current tree was scanned from (None for loaded trees)
    root_path: Option<PathBuf>,
    selection: Selection,
    gallery: Gallery,
    busy: bool,
}

impl Session {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            gallery: Gallery::new(items_per_page),
            ..Self::default()
        }
    }

    pub fn tree(&self) -> Option<&FolderNode> {
        self.tree.as_ref()
    }

    pub fn root_path(&self) -> Option<&PathBuf> {
        self.root_path.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut Gallery {
        &mut self.gallery
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Claim the session for a scan or load. Returns false if one is
    /// already running; overlapping requests are refused, not queued.
    pub fn begin_task(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn finish_task(&mut self) {
        self.busy = false;
    }

    /// Install a new tree. Selection is cleared and the gallery shows
    /// every file in the tree.
    pub fn replace_tree(&mut self, tree: FolderNode, root_path: Option<PathBuf>) {
        self.selection = Selection::new(&tree);
        self.gallery
            .set_media(tree.leaves().into_iter().cloned().collect());
        self.tree = Some(tree);
        self.root_path = root_path;
    }

    /// Apply a tree click and recompute the gallery from the new selection
    pub fn click(&mut self, index: usize, modifiers: ClickModifiers) -> bool {
        if !self.selection.click(index, modifiers) {
            return false;
        }
        self.gallery.set_media(self.selection.selected_media());
        true
    }
}
