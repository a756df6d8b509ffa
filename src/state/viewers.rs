/// Open media viewers, keyed by an opaque id
///
/// Each viewer only knows the file it was opened for. Entries live until
/// the viewer is closed and are released explicitly.
use std::collections::BTreeMap;

use super::data::MediaKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewerId(u64);

/// Launch arguments of one viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerArgs {
    pub path: String,
    pub kind: MediaKind,
}

#[derive(Debug, Default)]
pub struct ViewerRegistry {
    next_id: u64,
    open: BTreeMap<ViewerId, ViewerArgs>,
}

impl ViewerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, path: impl Into<String>, kind: MediaKind) -> ViewerId {
        self.next_id += 1;
        let id = ViewerId(self.next_id);
        self.open.insert(
            id,
            ViewerArgs {
                path: path.into(),
                kind,
            },
        );
        id
    }

    #[cfg(test)]
    pub fn args(&self, id: ViewerId) -> Option<&ViewerArgs> {
        self.open.get(&id)
    }

    /// Release a viewer. Returns its arguments if it was still open.
    pub fn close(&mut self, id: ViewerId) -> Option<ViewerArgs> {
        self.open.remove(&id)
    }

    /// The most recently opened viewer that is still open
    pub fn latest(&self) -> Option<(ViewerId, &ViewerArgs)> {
        self.open.iter().next_back().map(|(id, args)| (*id, args))
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
