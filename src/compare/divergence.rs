//! Three-way divergence between two commit histories.
//!
//! Commits are matched by hash; a commit present on both sides with a
//! different message (reworded during a rebase, say) lands in
//! `changed_message` with both variants. Output order tracks the
//! corresponding input list. Runs in O(n + m).

use std::collections::{HashMap, HashSet};

use crate::models::{ChangedMessage, CommitRecord, DivergenceReport};

/// Caller-selected comparison modes.
///
/// `hide_identical` switches matching from hash-identity to
/// message-identity: commits whose message appears anywhere on the
/// other side are dropped from both lists before the set difference.
/// The two modes are distinct; this is not a refinement of the default.
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    pub hide_identical: bool,
    pub author_filter: Option<String>,
}

/// Compute the divergence report for two commit lists.
///
/// Total over any inputs; empty lists yield an empty report.
pub fn compute_divergence(
    from_commits: &[CommitRecord],
    to_commits: &[CommitRecord],
    options: &CompareOptions,
) -> DivergenceReport {
    let from_side = filter_by_author(from_commits, options.author_filter.as_deref());
    let to_side = filter_by_author(to_commits, options.author_filter.as_deref());

    let (from_side, to_side) = if options.hide_identical {
        drop_shared_messages(from_side, to_side)
    } else {
        (from_side, to_side)
    };

    let to_by_hash: HashMap<&str, &CommitRecord> =
        to_side.iter().map(|c| (c.hash.as_str(), *c)).collect();
    let from_hashes: HashSet<&str> = from_side.iter().map(|c| c.hash.as_str()).collect();

    let only_in_from: Vec<CommitRecord> = from_side
        .iter()
        .filter(|c| !to_by_hash.contains_key(c.hash.as_str()))
        .map(|c| (*c).clone())
        .collect();

    let only_in_to: Vec<CommitRecord> = to_side
        .iter()
        .filter(|c| !from_hashes.contains(c.hash.as_str()))
        .map(|c| (*c).clone())
        .collect();

    // Messages compare byte-for-byte; author and timestamp carry over
    // from the `from` side.
    let changed_message: Vec<ChangedMessage> = from_side
        .iter()
        .filter_map(|c| {
            let other = to_by_hash.get(c.hash.as_str())?;
            (other.message != c.message).then(|| ChangedMessage {
                hash: c.hash.clone(),
                from_message: c.message.clone(),
                to_message: other.message.clone(),
                author: c.author.clone(),
                timestamp: c.timestamp,
            })
        })
        .collect();

    DivergenceReport {
        only_in_from,
        only_in_to,
        changed_message,
    }
}

/// Keep commits whose raw author contains `filter`, case-insensitively.
fn filter_by_author<'a>(
    commits: &'a [CommitRecord],
    filter: Option<&str>,
) -> Vec<&'a CommitRecord> {
    match filter {
        Some(f) if !f.is_empty() => {
            let needle = f.to_lowercase();
            commits
                .iter()
                .filter(|c| c.author.to_lowercase().contains(&needle))
                .collect()
        }
        _ => commits.iter().collect(),
    }
}

/// Remove from each side every commit whose message also occurs on the
/// other side.
fn drop_shared_messages<'a>(
    from_side: Vec<&'a CommitRecord>,
    to_side: Vec<&'a CommitRecord>,
) -> (Vec<&'a CommitRecord>, Vec<&'a CommitRecord>) {
    let from_messages: HashSet<&str> = from_side.iter().map(|c| c.message.as_str()).collect();
    let to_messages: HashSet<&str> = to_side.iter().map(|c| c.message.as_str()).collect();

    let kept_from = from_side
        .into_iter()
        .filter(|c| !to_messages.contains(c.message.as_str()))
        .collect();
    let kept_to = to_side
        .into_iter()
        .filter(|c| !from_messages.contains(c.message.as_str()))
        .collect();

    (kept_from, kept_to)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn make_commit(hash: &str, message: &str) -> CommitRecord {
        make_commit_by(hash, message, "Alice <alice@example.com>")
    }

    fn make_commit_by(hash: &str, message: &str, author: &str) -> CommitRecord {
        CommitRecord {
            hash: hash.to_string(),
            author: author.to_string(),
            timestamp: 0,
            message: message.to_string(),
        }
    }

    fn hashes(commits: &[CommitRecord]) -> Vec<&str> {
        commits.iter().map(|c| c.hash.as_str()).collect()
    }

    #[test]
    fn disjoint_and_shared_commits_partition() {
        let a = vec![make_commit("h1", "fix"), make_commit("h2", "add")];
        let b = vec![make_commit("h1", "fix"), make_commit("h3", "new")];

        let report = compute_divergence(&a, &b, &CompareOptions::default());

        assert_eq!(hashes(&report.only_in_from), ["h2"]);
        assert_eq!(hashes(&report.only_in_to), ["h3"]);
        assert!(report.changed_message.is_empty());
    }

    #[test]
    fn reworded_commit_appears_once_with_both_messages() {
        let a = vec![make_commit("h1", "fix bug")];
        let b = vec![make_commit("h1", "fix the bug")];

        let report = compute_divergence(&a, &b, &CompareOptions::default());

        assert!(report.only_in_from.is_empty());
        assert!(report.only_in_to.is_empty());
        assert_eq!(report.changed_message.len(), 1);
        let changed = &report.changed_message[0];
        assert_eq!(changed.hash, "h1");
        assert_eq!(changed.from_message, "fix bug");
        assert_eq!(changed.to_message, "fix the bug");
    }

    #[test]
    fn message_comparison_is_whitespace_sensitive() {
        let a = vec![make_commit("h1", "fix ")];
        let b = vec![make_commit("h1", "fix")];

        let report = compute_divergence(&a, &b, &CompareOptions::default());
        assert_eq!(report.changed_message.len(), 1);
    }

    #[test]
    fn empty_inputs_yield_empty_report() {
        let report = compute_divergence(&[], &[], &CompareOptions::default());
        assert!(report.only_in_from.is_empty());
        assert!(report.only_in_to.is_empty());
        assert!(report.changed_message.is_empty());
    }

    #[test]
    fn one_sided_input_lands_entirely_in_only_in_from() {
        let a = vec![make_commit("h1", "x"), make_commit("h2", "y")];
        let report = compute_divergence(&a, &[], &CompareOptions::default());

        assert_eq!(hashes(&report.only_in_from), ["h1", "h2"]);
        assert!(report.only_in_to.is_empty());
        assert!(report.changed_message.is_empty());
    }

    #[test]
    fn every_hash_lands_in_exactly_one_bucket() {
        let a = vec![
            make_commit("h1", "shared"),
            make_commit("h2", "reworded here"),
            make_commit("h3", "a only"),
        ];
        let b = vec![
            make_commit("h1", "shared"),
            make_commit("h2", "reworded there"),
            make_commit("h4", "b only"),
        ];

        let report = compute_divergence(&a, &b, &CompareOptions::default());

        let exclusive: HashSet<&str> = hashes(&report.only_in_from)
            .into_iter()
            .chain(hashes(&report.only_in_to))
            .collect();
        for changed in &report.changed_message {
            assert!(!exclusive.contains(changed.hash.as_str()));
        }
        assert_eq!(hashes(&report.only_in_from), ["h3"]);
        assert_eq!(hashes(&report.only_in_to), ["h4"]);
        assert_eq!(report.changed_message.len(), 1);
        assert_eq!(report.changed_message[0].hash, "h2");
    }

    #[test]
    fn swapping_inputs_mirrors_the_exclusive_sets() {
        let a = vec![make_commit("h1", "x"), make_commit("h2", "y")];
        let b = vec![make_commit("h2", "y"), make_commit("h3", "z")];

        let forward = compute_divergence(&a, &b, &CompareOptions::default());
        let backward = compute_divergence(&b, &a, &CompareOptions::default());

        let forward_from: HashSet<&str> = hashes(&forward.only_in_from).into_iter().collect();
        let backward_to: HashSet<&str> = hashes(&backward.only_in_to).into_iter().collect();
        assert_eq!(forward_from, backward_to);
    }

    #[test]
    fn reordering_inputs_preserves_the_sets() {
        let a = vec![make_commit("h1", "x"), make_commit("h2", "y")];
        let a_reversed: Vec<CommitRecord> = a.iter().rev().cloned().collect();
        let b = vec![make_commit("h2", "y"), make_commit("h3", "z")];

        let original = compute_divergence(&a, &b, &CompareOptions::default());
        let reordered = compute_divergence(&a_reversed, &b, &CompareOptions::default());

        let original_set: HashSet<&str> = hashes(&original.only_in_from).into_iter().collect();
        let reordered_set: HashSet<&str> = hashes(&reordered.only_in_from).into_iter().collect();
        assert_eq!(original_set, reordered_set);
        // Order still tracks the input that produced it.
        assert_eq!(hashes(&reordered.only_in_from), ["h1"]);
    }

    #[test]
    fn output_order_tracks_input_order() {
        let a = vec![
            make_commit("h3", "c"),
            make_commit("h1", "a"),
            make_commit("h2", "b"),
        ];
        let report = compute_divergence(&a, &[], &CompareOptions::default());
        assert_eq!(hashes(&report.only_in_from), ["h3", "h1", "h2"]);
    }

    #[test]
    fn hide_identical_drops_message_matches_from_both_sides() {
        let a = vec![make_commit("h1", "x"), make_commit("h2", "y")];
        let b = vec![make_commit("h3", "x"), make_commit("h4", "z")];

        let options = CompareOptions {
            hide_identical: true,
            ..Default::default()
        };
        let report = compute_divergence(&a, &b, &options);

        assert_eq!(hashes(&report.only_in_from), ["h2"]);
        assert_eq!(hashes(&report.only_in_to), ["h4"]);
    }

    #[test]
    fn author_filter_applies_to_both_sides_before_comparison() {
        let a = vec![
            make_commit_by("h1", "x", "Alice Smith <alice@example.com>"),
            make_commit_by("h2", "y", "Bob <bob@example.com>"),
        ];
        let b = vec![
            make_commit_by("h3", "z", "ALICE Smith <alice@example.com>"),
            make_commit_by("h4", "w", "Carol <carol@example.com>"),
        ];

        let options = CompareOptions {
            author_filter: Some("alice".to_string()),
            ..Default::default()
        };
        let report = compute_divergence(&a, &b, &options);

        assert_eq!(hashes(&report.only_in_from), ["h1"]);
        assert_eq!(hashes(&report.only_in_to), ["h3"]);
    }
}
