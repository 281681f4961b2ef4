use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Tag entity - a label attached to any number of posts.
///
/// Names are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
}

impl NewTag {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

/// Ids in `requested` that have no matching tag in `found`.
pub fn missing_tag_ids(requested: &BTreeSet<i32>, found: &[Tag]) -> Vec<i32> {
    let found: BTreeSet<i32> = found.iter().map(|t| t.id).collect();
    requested.difference(&found).copied().collect()
}
