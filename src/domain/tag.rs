// src/domain/tag.rs

use serde::Serialize;

/// Free-form label attachable to properties. Names are unique across all
/// tags; the `tags.name` UNIQUE constraint backstops that rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
}
