/// Tree selection state machine
///
/// The tree is flattened once (pre-order, root excluded) whenever it is
/// replaced. Every node keeps its flattened index for the lifetime of the
/// tree, whether or not its parent is expanded, so range selection can span
/// collapsed rows. Node identity is the flattened index.
use std::collections::HashSet;

use super::data::{FileNode, FolderNode, MediaNode};

/// Modifier keys held during a click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    /// Ctrl (or Cmd): flip membership instead of replacing the selection
    pub toggle: bool,
    /// Shift: select the span between the anchor and the clicked row
    pub range: bool,
}

impl ClickModifiers {
    pub const PLAIN: Self = Self {
        toggle: false,
        range: false,
    };

    pub fn is_plain(self) -> bool {
        !self.toggle && !self.range
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    Folder,
    File(FileNode),
}

/// One row of the flattened tree
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    pub name: String,
    pub path: String,
    /// Nesting level; the root's direct children are at depth 0
    pub depth: usize,
    pub kind: EntryKind,
    /// One past the index of the last descendant. Descendants of a row
    /// occupy `index + 1 .. subtree_end`.
    pub subtree_end: usize,
}

impl FlatEntry {
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, EntryKind::Folder)
    }
}

/// Pre-order traversal of everything below `tree`
pub fn flatten(tree: &FolderNode) -> Vec<FlatEntry> {
    let mut out = Vec::new();
    flatten_into(&tree.children, 0, &mut out);
    out
}

fn flatten_into(children: &[MediaNode], depth: usize, out: &mut Vec<FlatEntry>) {
    for child in children {
        let index = out.len();
        let kind = match child {
            MediaNode::Folder(_) => EntryKind::Folder,
            MediaNode::File(file) => EntryKind::File(file.clone()),
        };
        out.push(FlatEntry {
            name: child.name().to_string(),
            path: child.path().to_string(),
            depth,
            kind,
            subtree_end: index + 1,
        });

        if let MediaNode::Folder(folder) = child {
            flatten_into(&folder.children, depth + 1, out);
            out[index].subtree_end = out.len();
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    entries: Vec<FlatEntry>,
    /// Selected rows in the order they were added
    selected: Vec<usize>,
    /// Same rows as `selected`, for membership tests
    members: HashSet<usize>,
    anchor: Option<usize>,
    expanded: HashSet<usize>,
}

impl Selection {
    pub fn new(tree: &FolderNode) -> Self {
        Self {
            entries: flatten(tree),
            ..Self::default()
        }
    }

    pub fn entries(&self) -> &[FlatEntry] {
        &self.entries
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    #[cfg(test)]
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    /// Apply a click on row `index`. Returns false (and changes nothing)
    /// when the index is out of range.
    pub fn click(&mut self, index: usize, modifiers: ClickModifiers) -> bool {
        if index >= self.entries.len() {
            return false;
        }

        if modifiers.range {
            if let Some(anchor) = self.anchor {
                self.select_range(anchor, index, modifiers.toggle);
                return true;
            }
        }

        if modifiers.toggle {
            self.flip(index);
        } else {
            self.clear_selected();
            self.add(index);
        }

        if modifiers.is_plain() && self.entries[index].is_folder() {
            if !self.expanded.remove(&index) {
                self.expanded.insert(index);
            }
        }

        self.anchor = Some(index);
        true
    }

    // The anchor stays where it was.
    fn select_range(&mut self, anchor: usize, index: usize, toggle: bool) {
        if !toggle {
            self.clear_selected();
        }

        let start = anchor.min(index);
        let end = anchor.max(index).min(self.entries.len().saturating_sub(1));
        let mut removed = false;
        for i in start..=end {
            if toggle && self.members.remove(&i) {
                removed = true;
            } else {
                self.add(i);
            }
        }

        if removed {
            let members = &self.members;
            self.selected.retain(|i| members.contains(i));
        }
    }

    fn flip(&mut self, index: usize) {
        if self.members.remove(&index) {
            self.selected.retain(|&s| s != index);
        } else {
            self.add(index);
        }
    }

    fn add(&mut self, index: usize) {
        if self.members.insert(index) {
            self.selected.push(index);
        }
    }

    fn clear_selected(&mut self) {
        self.selected.clear();
        self.members.clear();
    }

    /// Rows to draw: a row is visible when every folder above it is expanded
    pub fn visible_rows(&self) -> Vec<usize> {
        let mut rows = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            rows.push(i);
            let entry = &self.entries[i];
            if entry.is_folder() && !self.is_expanded(i) {
                i = entry.subtree_end;
            } else {
                i += 1;
            }
        }
        rows
    }

    /// Files under the selected rows, deduplicated by path in first-seen order
    pub fn selected_media(&self) -> Vec<FileNode> {
        let mut seen = HashSet::new();
        let mut media = Vec::new();

        for &index in &self.selected {
            let entry = &self.entries[index];
            for row in &self.entries[index..entry.subtree_end] {
                if let EntryKind::File(file) = &row.kind {
                    if seen.insert(file.path.as_str()) {
                        media.push(file.clone());
                    }
                }
            }
        }

        media
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::MediaKind;
    use std::path::Path;

    fn file(path: &str) -> MediaNode {
        MediaNode::File(FileNode::new(Path::new(path), MediaKind::Image, 1))
    }

    fn folder(path: &str, children: Vec<MediaNode>) -> MediaNode {
        let mut node = FolderNode::new(Path::new(path));
        node.children = children;
        MediaNode::Folder(node)
    }

    /// Flattened:
    /// 0 a (folder)
    /// 1   a/1.jpg
    /// 2   a/2.jpg
    /// 3 b (folder)
    /// 4   b/c (folder)
    /// 5     b/c/3.jpg
    /// 6 4.jpg
    fn sample() -> FolderNode {
        let mut root = FolderNode::new(Path::new("/r"));
        root.children = vec![
            folder("/r/a", vec![file("/r/a/1.jpg"), file("/r/a/2.jpg")]),
            folder("/r/b", vec![folder("/r/b/c", vec![file("/r/b/c/3.jpg")])]),
            file("/r/4.jpg"),
        ];
        root
    }

    fn paths(media: &[FileNode]) -> Vec<&str> {
        media.iter().map(|f| f.path.as_str()).collect()
    }

    const TOGGLE: ClickModifiers = ClickModifiers {
        toggle: true,
        range: false,
    };
    const RANGE: ClickModifiers = ClickModifiers {
        toggle: false,
        range: true,
    };
    const TOGGLE_RANGE: ClickModifiers = ClickModifiers {
        toggle: true,
        range: true,
    };

    #[test]
    fn test_flatten_is_preorder_with_subtree_bounds() {
        let entries = flatten(&sample());
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "1.jpg", "2.jpg", "b", "c", "3.jpg", "4.jpg"]);
        assert_eq!(entries[0].subtree_end, 3);
        assert_eq!(entries[3].subtree_end, 6);
        assert_eq!(entries[4].subtree_end, 6);
        assert_eq!(entries[6].subtree_end, 7);
        assert_eq!(entries[5].depth, 2);
    }

    #[test]
    fn test_plain_click_replaces_selection_and_sets_anchor() {
        let mut sel = Selection::new(&sample());
        sel.click(1, ClickModifiers::PLAIN);
        sel.click(6, ClickModifiers::PLAIN);
        assert_eq!(sel.selected(), &[6]);
        assert_eq!(sel.anchor(), Some(6));
    }

    #[test]
    fn test_toggle_click_flips_membership() {
        let mut sel = Selection::new(&sample());
        sel.click(1, ClickModifiers::PLAIN);
        sel.click(2, TOGGLE);
        assert_eq!(sel.selected(), &[1, 2]);
        sel.click(1, TOGGLE);
        assert_eq!(sel.selected(), &[2]);
        assert_eq!(sel.anchor(), Some(1));
    }

    #[test]
    fn test_range_is_symmetric() {
        let mut forward = Selection::new(&sample());
        forward.click(1, ClickModifiers::PLAIN);
        forward.click(5, RANGE);

        let mut backward = Selection::new(&sample());
        backward.click(5, ClickModifiers::PLAIN);
        backward.click(1, RANGE);

        let mut a = forward.selected().to_vec();
        let mut b = backward.selected().to_vec();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, vec![1, 2, 3, 4, 5]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_range_keeps_anchor() {
        let mut sel = Selection::new(&sample());
        sel.click(2, ClickModifiers::PLAIN);
        sel.click(5, RANGE);
        assert_eq!(sel.anchor(), Some(2));
        sel.click(0, RANGE);
        assert_eq!(sel.selected(), &[0, 1, 2]);
    }

    #[test]
    fn test_toggle_range_flips_selected_rows() {
        let mut sel = Selection::new(&sample());
        sel.click(1, ClickModifiers::PLAIN);
        sel.click(2, TOGGLE);
        sel.click(3, TOGGLE);
        // anchor is 3; span 1..=3 currently all selected -> all removed
        sel.click(1, TOGGLE_RANGE);
        assert!(sel.selected().is_empty());
        // span 3..=5 none selected -> all added
        sel.click(5, TOGGLE_RANGE);
        assert_eq!(sel.selected(), &[3, 4, 5]);
    }

    #[test]
    fn test_range_over_large_flat_list() {
        let count = 100_000;
        let mut root = FolderNode::new(Path::new("/r"));
        root.children = (0..count).map(|i| file(&format!("/r/{i}.jpg"))).collect();

        let mut sel = Selection::new(&root);
        sel.click(0, ClickModifiers::PLAIN);
        sel.click(count - 1, RANGE);
        assert_eq!(sel.selected().len(), count);
        assert!(sel.selected().iter().copied().eq(0..count));
        assert!(sel.is_selected(count / 2));

        // Re-adding 10 moves it to the end and makes it the anchor
        sel.click(10, TOGGLE);
        sel.click(10, TOGGLE);
        assert_eq!(sel.selected().last(), Some(&10));

        // Everything in 10..=count-11 is selected, so the span is removed
        sel.click(count - 11, TOGGLE_RANGE);
        assert_eq!(sel.selected().len(), 20);
        assert!(!sel.is_selected(10));
        assert!(sel.is_selected(9));
        assert!(sel.is_selected(count - 10));
        assert_eq!(sel.selected()[..3], [0, 1, 2]);
        assert_eq!(sel.selected_media().len(), 20);
    }

    #[test]
    fn test_range_without_anchor_acts_as_click() {
        let mut sel = Selection::new(&sample());
        sel.click(0, RANGE);
        assert_eq!(sel.selected(), &[0]);
        assert_eq!(sel.anchor(), Some(0));
        // shift is not a plain click, so the folder stays collapsed
        assert!(!sel.is_expanded(0));
    }

    #[test]
    fn test_plain_folder_click_toggles_expansion() {
        let mut sel = Selection::new(&sample());
        assert_eq!(sel.visible_rows(), vec![0, 3, 6]);

        sel.click(0, ClickModifiers::PLAIN);
        assert!(sel.is_expanded(0));
        assert_eq!(sel.visible_rows(), vec![0, 1, 2, 3, 6]);

        sel.click(3, TOGGLE);
        assert!(!sel.is_expanded(3));

        sel.click(0, ClickModifiers::PLAIN);
        assert!(!sel.is_expanded(0));
        assert_eq!(sel.visible_rows(), vec![0, 3, 6]);
    }

    #[test]
    fn test_nested_expansion_requires_every_ancestor() {
        let mut sel = Selection::new(&sample());
        sel.click(3, ClickModifiers::PLAIN);
        assert_eq!(sel.visible_rows(), vec![0, 3, 4, 6]);
        sel.click(4, ClickModifiers::PLAIN);
        assert_eq!(sel.visible_rows(), vec![0, 3, 4, 5, 6]);
        sel.click(3, ClickModifiers::PLAIN);
        assert_eq!(sel.visible_rows(), vec![0, 3, 6]);
    }

    #[test]
    fn test_out_of_range_click_is_ignored() {
        let mut sel = Selection::new(&sample());
        sel.click(1, ClickModifiers::PLAIN);
        assert!(!sel.click(42, ClickModifiers::PLAIN));
        assert_eq!(sel.selected(), &[1]);
        assert_eq!(sel.anchor(), Some(1));
    }

    #[test]
    fn test_selected_media_collects_subtrees() {
        let mut sel = Selection::new(&sample());
        sel.click(3, ClickModifiers::PLAIN);
        assert_eq!(paths(&sel.selected_media()), vec!["/r/b/c/3.jpg"]);

        sel.click(6, TOGGLE);
        sel.click(0, TOGGLE);
        assert_eq!(
            paths(&sel.selected_media()),
            vec!["/r/b/c/3.jpg", "/r/4.jpg", "/r/a/1.jpg", "/r/a/2.jpg"]
        );
    }

    #[test]
    fn test_selected_media_dedups_overlapping_selection() {
        let mut sel = Selection::new(&sample());
        sel.click(5, ClickModifiers::PLAIN);
        sel.click(3, TOGGLE);
        sel.click(4, TOGGLE);
        assert_eq!(paths(&sel.selected_media()), vec!["/r/b/c/3.jpg"]);
    }

    #[test]
    fn test_dedup_across_folders_sharing_a_path() {
        // Same file path reachable below two different folders
        let mut root = FolderNode::new(Path::new("/r"));
        root.children = vec![
            folder("/r/x", vec![file("/r/shared.jpg"), file("/r/x/1.jpg")]),
            folder("/r/y", vec![file("/r/shared.jpg")]),
        ];
        let mut sel = Selection::new(&root);
        sel.click(0, ClickModifiers::PLAIN);
        sel.click(3, TOGGLE);
        assert_eq!(
            paths(&sel.selected_media()),
            vec!["/r/shared.jpg", "/r/x/1.jpg"]
        );
    }
}
