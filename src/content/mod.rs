//! Daily content: the nested source collection and the item selector.
//!
//! A collection is a three-level tree (book → chapter → verse). The
//! selector picks one leaf and turns it into a [`ContentItem`] with a
//! human-readable reference such as `"John 3:16"`.

pub mod collection;
pub mod selector;

pub use collection::{ContentCollection, ContentGroup, ContentLeaf, ContentSubgroup};
pub use selector::{ContentSelector, RandomSelector, select_content};

use serde::{Deserialize, Serialize};

/// A single selectable unit of display content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Source locator, e.g. `"Psalms 23:1"`.
    pub reference: String,
    /// Quoted passage.
    pub text: String,
}

impl ContentItem {
    /// Create an item from its reference and text.
    pub fn new(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: text.into(),
        }
    }
}

impl std::fmt::Display for ContentItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" ({})", self.text, self.reference)
    }
}
