//! Nested content collection loaded from JSON.
//!
//! Accepts both the generic field names (`groups`, `subgroups`, `items`,
//! `number`) and the Bible-shaped ones (`books`, `chapters`/`chapter`,
//! `verses`/`verse`).

use crate::error::{Result, VerseError};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUNDLED_COLLECTION: &str = include_str!("../../assets/sample_collection.json");

/// Top level of the collection (e.g. the list of books).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCollection {
    #[serde(default, alias = "books")]
    pub groups: Vec<ContentGroup>,
}

/// A named group (e.g. a book).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentGroup {
    pub name: String,
    #[serde(default, alias = "chapters")]
    pub subgroups: Vec<ContentSubgroup>,
}

/// A numbered subgroup (e.g. a chapter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSubgroup {
    /// Label used in references; 1-based position when absent.
    #[serde(default, alias = "chapter", skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, alias = "verses")]
    pub items: Vec<ContentLeaf>,
}

/// A leaf item (e.g. a verse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLeaf {
    /// Label used in references; 1-based position when absent.
    #[serde(default, alias = "verse", skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    pub text: String,
}

impl ContentCollection {
    /// Parse a collection from JSON and validate its shape.
    ///
    /// # Errors
    ///
    /// Returns [`VerseError::Json`] on malformed JSON and
    /// [`VerseError::Collection`] when a level is empty.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let collection: Self = serde_json::from_str(json)?;
        collection.validate()?;
        Ok(collection)
    }

    /// Load and validate a collection file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json).map_err(|e| match e {
            VerseError::Collection(msg) => {
                VerseError::Collection(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// The sample collection compiled into the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled asset is itself malformed.
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_COLLECTION)
    }

    /// Reject collections the selector could walk into a dead end.
    ///
    /// # Errors
    ///
    /// Returns [`VerseError::Collection`] describing the first empty level,
    /// blank group name or blank leaf text.
    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(VerseError::Collection("collection has no groups".to_owned()));
        }
        for (g, group) in self.groups.iter().enumerate() {
            if group.name.trim().is_empty() {
                return Err(VerseError::Collection(format!("group {g} has an empty name")));
            }
            if group.subgroups.is_empty() {
                return Err(VerseError::Collection(format!(
                    "group '{}' has no subgroups",
                    group.name
                )));
            }
            for (s, subgroup) in group.subgroups.iter().enumerate() {
                if subgroup.items.is_empty() {
                    return Err(VerseError::Collection(format!(
                        "group '{}' subgroup {} has no items",
                        group.name,
                        subgroup.label(s)
                    )));
                }
                if let Some(i) = subgroup.items.iter().position(|l| l.text.trim().is_empty()) {
                    return Err(VerseError::Collection(format!(
                        "group '{}' subgroup {} item {} has empty text",
                        group.name,
                        subgroup.label(s),
                        subgroup.items[i].label(i)
                    )));
                }
            }
        }
        Ok(())
    }

    /// Total number of leaf items.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.subgroups.iter())
            .map(|s| s.items.len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaf_count() == 0
    }
}

impl ContentSubgroup {
    /// Reference label for the subgroup at `index`.
    #[must_use]
    pub fn label(&self, index: usize) -> u32 {
        self.number.unwrap_or_else(|| position_label(index))
    }
}

impl ContentLeaf {
    /// Reference label for the leaf at `index`.
    #[must_use]
    pub fn label(&self, index: usize) -> u32 {
        self.number.unwrap_or_else(|| position_label(index))
    }
}

fn position_label(index: usize) -> u32 {
    u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1))
}
