//! Multi-step intake aggregation.
//!
//! Basic intake appends a pending record and opens a draft; nature
//! completion expands the follow-up form into a tree, normalizes it against
//! the nature's schema, merges it into the draft record, flips the status to
//! ready, and clears the draft in the same transaction. A missing or stale
//! draft aborts before anything is written, leaving the store untouched.

use std::collections::btree_map::Entry;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::FormConfig;
use crate::error::{Error, Result};
use crate::record::{IncidentRecord, IncidentStatus, Nature};
use crate::schema;
use crate::store::Store;
use crate::tree;

/// Parse a raw `key=value` form entry.
///
/// A bare key without `=` marks a checked checkbox and gets the value `on`.
///
/// # Errors
///
/// Returns a validation error for an empty entry or an empty key.
pub fn parse_entry(raw: &str) -> Result<(String, String)> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::validation("empty field entry"));
    }
    match raw.split_once('=') {
        Some((key, value)) => {
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::validation(format!("entry '{raw}' has an empty key")));
            }
            Ok((key.to_string(), value.trim().to_string()))
        }
        None => Ok((raw.to_string(), "on".to_string())),
    }
}

/// Parse a batch of raw `key=value` form entries.
///
/// # Errors
///
/// Returns the first entry-level validation error.
pub fn parse_entries(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter().map(|entry| parse_entry(entry)).collect()
}

/// Create a pending record from basic intake fields and open a draft for it.
///
/// Returns the index of the new record.
///
/// # Errors
///
/// Returns a validation error if the entries are empty or malformed, or a
/// storage error if the write fails.
pub fn begin_incident(
    store: &mut Store,
    entries: &[(String, String)],
    form: &FormConfig,
) -> Result<usize> {
    if entries.is_empty() {
        return Err(Error::validation("basic intake requires at least one field"));
    }
    check_value_lengths(entries, form)?;

    if let Some(stale) = store.draft_index()? {
        // Starting over supersedes whatever flow was abandoned mid-way.
        warn!("Discarding stale draft pointing at index {stale}");
    }

    let basic = tree::build_tree(entries, form.conflict_policy)?;
    let record = IncidentRecord::new(basic);
    let index = store.append_draft(record)?;
    info!("Created incident record {index} (pending)");
    Ok(index)
}

/// Merge a nature follow-up payload into the draft record and complete it.
///
/// Returns the index of the completed record.
///
/// # Errors
///
/// Returns [`Error::NoDraft`] or [`Error::MissingAnchor`] when there is no
/// record to complete (store left unmodified), a validation error if the
/// payload fails schema normalization, or a storage error if the commit
/// fails.
pub fn complete_incident(
    store: &mut Store,
    nature: Nature,
    entries: &[(String, String)],
    form: &FormConfig,
) -> Result<usize> {
    check_value_lengths(entries, form)?;

    let Some(index) = store.draft_index()? else {
        return Err(Error::NoDraft);
    };
    let mut records = store.records()?;
    if index >= records.len() {
        return Err(Error::MissingAnchor {
            index,
            len: records.len(),
        });
    }

    let mut payload = tree::build_tree(entries, form.conflict_policy)?;
    schema::normalize(&mut payload, schema::schema_for(nature), form.conflict_policy)?;

    let record = &mut records[index];
    match record.natures.entry(nature) {
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Value::Object(existing) => tree::shallow_merge(existing, payload),
            other => *other = Value::Object(payload),
        },
        Entry::Vacant(slot) => {
            slot.insert(Value::Object(payload));
        }
    }
    record.status = IncidentStatus::Ready;

    store.commit_completion(&records)?;
    info!("Completed incident record {index} as {nature}");
    Ok(index)
}

/// Abandon the in-progress draft, clearing the pointer and touching no
/// records. Returns `true` if a draft was in progress.
///
/// # Errors
///
/// Returns a storage error if the write fails.
pub fn abandon_draft(store: &mut Store) -> Result<bool> {
    store.abandon_draft()
}

fn check_value_lengths(entries: &[(String, String)], form: &FormConfig) -> Result<()> {
    for (key, value) in entries {
        if value.len() > form.max_value_length {
            return Err(Error::validation(format!(
                "value for '{key}' exceeds {} bytes",
                form.max_value_length
            )));
        }
    }
    Ok(())
}
