//! Session clearing on logout.
//!
//! Logout removes the configured session keys (auth token, cached profile)
//! from the shared store. The daily record lives under its own key and is
//! deliberately left alone, so the verse survives a logout.

use crate::error::Result;
use crate::store::KeyValueStore;
use tracing::{info, warn};

/// Remove every key in `keys` from `store`.
///
/// Returns how many keys held a value. All keys are attempted even when one
/// removal fails; the first failure is returned afterwards.
///
/// # Errors
///
/// Returns the first store error encountered.
pub async fn logout(store: &dyn KeyValueStore, keys: &[String]) -> Result<usize> {
    let mut removed = 0;
    let mut first_error = None;

    for key in keys {
        match store.remove(key).await {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(e) => {
                warn!(%key, "cannot clear session key: {e}");
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }
    info!(removed, "session cleared");
    Ok(removed)
}

/// Whether any session key currently holds a value.
///
/// # Errors
///
/// Propagates store read failures.
pub async fn has_session(store: &dyn KeyValueStore, keys: &[String]) -> Result<bool> {
    for key in keys {
        if store.get(key).await?.is_some() {
            return Ok(true);
        }
    }
    Ok(false)
}
