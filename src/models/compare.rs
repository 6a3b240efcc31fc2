//! Comparison DTOs.
//!
//! - `ResolvedRef`: which concrete ref a short name resolved to
//! - `DivergenceReport`: three-way set difference between two histories
//! - `ChangedMessage`: same commit on both sides with a reworded message
//! - `CompareResponse`: report plus the counts a summary view needs

use serde::{Deserialize, Serialize};

use super::CommitRecord;

/// The concrete ref to query for a user-supplied short name.
///
/// `query_ref` is passed verbatim to commit listing; an unresolvable
/// name comes back unchanged and fails downstream, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedRef {
    pub query_ref: String,
    pub used_remote: bool,
}

/// A commit present on both sides (same hash) whose message differs.
/// Author and timestamp come from the `from` side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangedMessage {
    pub hash: String,
    pub from_message: String,
    pub to_message: String,
    pub author: String,
    pub timestamp: i64,
}

/// Three-way divergence between two commit lists.
///
/// A hash appears in at most one of `only_in_from` / `only_in_to` /
/// the common set; `changed_message` is the common subset whose
/// messages differ. Element order tracks the corresponding input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DivergenceReport {
    pub only_in_from: Vec<CommitRecord>,
    pub only_in_to: Vec<CommitRecord>,
    pub changed_message: Vec<ChangedMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub from: ResolvedRef,
    pub to: ResolvedRef,
    pub from_total: usize,
    pub to_total: usize,
    pub only_in_from_count: usize,
    pub only_in_to_count: usize,
    pub changed_message_count: usize,
    pub report: DivergenceReport,
}

/// Last-used compare inputs, returned to prepopulate the panel form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareDefaults {
    pub from: Option<String>,
    pub to: Option<String>,
}
