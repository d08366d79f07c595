//! Post list ordering

use crate::store::Post;

/// Two-way ordering by post id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `""` and `"asc"` sort ascending; any other value sorts descending.
    pub fn parse(value: &str) -> Self {
        match value {
            "" | "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn apply(self, posts: &mut [Post]) {
        match self {
            SortOrder::Asc => posts.sort_by_key(|p| p.id),
            SortOrder::Desc => posts.sort_by(|a, b| b.id.cmp(&a.id)),
        }
    }
}
