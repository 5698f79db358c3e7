use crate::markup::NodeId;

/// The assembler's output for one markup node that becomes a DOM node: a
/// stable name, the parent's name (iff the parent is itself in this list),
/// and a back-reference to the underlying node.
#[derive(Debug, Clone)]
pub struct NamedVar {
    pub node_id: NodeId,
    pub name: String,
    pub parent_name: Option<String>,
}

/// An ordered set of (index, name) pairs reflecting declaration order of
/// root-scope script variables. Used by both rewriters and the generator.
#[derive(Debug, Clone, Default)]
pub struct VarInfo {
    entries: Vec<(usize, String)>,
}

impl VarInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize, name: impl Into<String>) {
        self.entries.push((index, name.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, String)> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, n)| n.as_str()).collect()
    }

    /// Bitwise OR of `1 << index` over every entry — the dirty mask.
    pub fn dirty_mask(&self) -> u64 {
        self.entries.iter().fold(0u64, |acc, (i, _)| acc | (1u64 << i))
    }

    /// Merge several infos by union of indices; distinct entries claiming
    /// the same index but a different name indicate an inconsistent
    /// mapping and panic (a bug in the caller, not recoverable user error).
    pub fn merge(parts: impl IntoIterator<Item = VarInfo>) -> VarInfo {
        let mut merged: Vec<(usize, String)> = Vec::new();
        for part in parts {
            for (idx, name) in part.entries {
                if let Some((_, existing)) = merged.iter().find(|(i, _)| *i == idx) {
                    assert_eq!(
                        existing, &name,
                        "VarInfo::merge: index {idx} claimed by both {existing:?} and {name:?}"
                    );
                    continue;
                }
                merged.push((idx, name));
            }
        }
        VarInfo { entries: merged }
    }
}
