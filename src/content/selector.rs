//! Random content selection.
//!
//! Selection is uniform per level: a random group, then a random subgroup
//! inside it, then a random leaf inside that. Leaves in small groups are
//! therefore more likely than leaves in large ones.

use crate::content::{ContentCollection, ContentItem};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Source of fresh daily content.
pub trait ContentSelector: Send + Sync {
    /// Produce a new item, or `None` when nothing can be selected.
    fn select(&self) -> Option<ContentItem>;
}

/// Pick one item from `collection` using `rng`.
///
/// Returns `None` when the collection is empty or the chosen path hits an
/// empty level, a blank group name or blank leaf text.
pub fn select_content<R: Rng + ?Sized>(
    collection: &ContentCollection,
    rng: &mut R,
) -> Option<ContentItem> {
    let group = pick(&collection.groups, rng)?;
    if group.name.trim().is_empty() {
        return None;
    }

    let subgroup_index = pick_index(group.subgroups.len(), rng)?;
    let subgroup = &group.subgroups[subgroup_index];

    let leaf_index = pick_index(subgroup.items.len(), rng)?;
    let leaf = &subgroup.items[leaf_index];
    if leaf.text.trim().is_empty() {
        return None;
    }

    Some(ContentItem {
        reference: format!(
            "{} {}:{}",
            group.name,
            subgroup.label(subgroup_index),
            leaf.label(leaf_index)
        ),
        text: leaf.text.clone(),
    })
}

fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    pick_index(items.len(), rng).map(|i| &items[i])
}

fn pick_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}

/// [`ContentSelector`] drawing from a shared collection with its own RNG.
pub struct RandomSelector {
    collection: Arc<ContentCollection>,
    rng: Mutex<StdRng>,
}

impl RandomSelector {
    /// Selector seeded from OS entropy.
    #[must_use]
    pub fn new(collection: Arc<ContentCollection>) -> Self {
        Self {
            collection,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Selector with a fixed seed for reproducible picks.
    #[must_use]
    pub fn with_seed(collection: Arc<ContentCollection>, seed: u64) -> Self {
        Self {
            collection,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    #[must_use]
    pub fn collection(&self) -> &ContentCollection {
        &self.collection
    }
}

impl ContentSelector for RandomSelector {
    fn select(&self) -> Option<ContentItem> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        select_content(&self.collection, &mut *rng)
    }
}
