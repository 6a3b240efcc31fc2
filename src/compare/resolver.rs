//! Ref resolution.
//!
//! A short name like `main` may denote a local branch, a same-named
//! remote-tracking branch, or a literal rev (tag, SHA). When both the
//! local and remote branches exist and have diverged, the freshest side
//! wins: remote-ahead beats local-ahead, and a tie falls back to the
//! remote. Resolution never fails; an unknown name is returned as-is
//! and validated by the downstream commit listing.

use crate::models::ResolvedRef;

/// The remote whose tracking branches are consulted.
pub const REMOTE: &str = "origin";

/// Read-only queries the resolver needs from the repository.
///
/// Infallible at this boundary: a query that fails or cannot answer
/// returns `false`/`None`, which the decision tree absorbs.
pub trait RefQueries {
    /// Does a local branch `<name>` exist?
    fn local_ref_exists(&self, name: &str) -> bool;

    /// Does a remote-tracking branch `origin/<name>` exist?
    fn remote_ref_exists(&self, name: &str) -> bool;

    /// Commit id a ref points to, peeled through tags.
    fn resolve_to_commit_id(&self, refname: &str) -> Option<String>;

    /// Merge base of two refs.
    fn common_ancestor(&self, a: &str, b: &str) -> Option<String>;

    /// Commits reachable from `head` but not from `base`.
    fn count_commits_between(&self, base: &str, head: &str) -> Option<usize>;
}

/// Decide which concrete ref to query for `name`.
pub fn resolve_ref(name: &str, queries: &dyn RefQueries) -> ResolvedRef {
    let remote_name = format!("{REMOTE}/{name}");

    let remote_id = queries
        .remote_ref_exists(name)
        .then(|| queries.resolve_to_commit_id(&remote_name))
        .flatten();
    let local_id = queries
        .local_ref_exists(name)
        .then(|| queries.resolve_to_commit_id(name))
        .flatten();

    match (local_id, remote_id) {
        // Neither side knows the name: treat it as a literal rev.
        (None, None) => ResolvedRef {
            query_ref: name.to_string(),
            used_remote: false,
        },
        (Some(_), None) => ResolvedRef {
            query_ref: name.to_string(),
            used_remote: false,
        },
        (None, Some(_)) => ResolvedRef {
            query_ref: remote_name,
            used_remote: true,
        },
        // Same commit on both sides: the remote copy is canonical.
        (Some(local), Some(remote)) if local == remote => ResolvedRef {
            query_ref: remote_name,
            used_remote: true,
        },
        (Some(_), Some(_)) => {
            let (local_ahead, remote_ahead) = match queries.common_ancestor(name, &remote_name) {
                Some(base) => (
                    queries.count_commits_between(&base, name).unwrap_or(0),
                    queries.count_commits_between(&base, &remote_name).unwrap_or(0),
                ),
                // Comparison failed entirely; counts of zero fall through
                // to the remote default below.
                None => (0, 0),
            };

            // Remote-ahead wins even when local is also ahead. Local-only
            // commits drop out of the default view in that case; the
            // policy lives here and nowhere else.
            if remote_ahead > 0 {
                ResolvedRef {
                    query_ref: remote_name,
                    used_remote: true,
                }
            } else if local_ahead > 0 {
                ResolvedRef {
                    query_ref: name.to_string(),
                    used_remote: false,
                }
            } else {
                ResolvedRef {
                    query_ref: remote_name,
                    used_remote: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;

    /// In-memory ref store: refname -> commit id, plus ahead counts
    /// keyed by the head ref of the count query.
    #[derive(Default)]
    struct FakeRefs {
        ids: HashMap<String, String>,
        locals: HashSet<String>,
        remotes: HashSet<String>,
        ancestor: Option<String>,
        ahead: HashMap<String, usize>,
        counts_fail: bool,
    }

    impl FakeRefs {
        fn with_local(mut self, name: &str, id: &str) -> Self {
            self.locals.insert(name.to_string());
            self.ids.insert(name.to_string(), id.to_string());
            self
        }

        fn with_remote(mut self, name: &str, id: &str) -> Self {
            self.remotes.insert(name.to_string());
            self.ids.insert(format!("origin/{name}"), id.to_string());
            self
        }

        fn with_divergence(mut self, base: &str, local_ahead: usize, remote_ahead: usize) -> Self {
            self.ancestor = Some(base.to_string());
            for name in self.locals.clone() {
                self.ahead.insert(name.clone(), local_ahead);
                self.ahead.insert(format!("origin/{name}"), remote_ahead);
            }
            self
        }
    }

    impl RefQueries for FakeRefs {
        fn local_ref_exists(&self, name: &str) -> bool {
            self.locals.contains(name)
        }

        fn remote_ref_exists(&self, name: &str) -> bool {
            self.remotes.contains(name)
        }

        fn resolve_to_commit_id(&self, refname: &str) -> Option<String> {
            self.ids.get(refname).cloned()
        }

        fn common_ancestor(&self, _a: &str, _b: &str) -> Option<String> {
            self.ancestor.clone()
        }

        fn count_commits_between(&self, _base: &str, head: &str) -> Option<usize> {
            if self.counts_fail {
                return None;
            }
            self.ahead.get(head).copied()
        }
    }

    #[test]
    fn unknown_name_passes_through_as_literal() {
        let refs = FakeRefs::default();
        let resolved = resolve_ref("deadbeef", &refs);
        assert_eq!(resolved.query_ref, "deadbeef");
        assert!(!resolved.used_remote);
    }

    #[test]
    fn local_only_branch_stays_local() {
        let refs = FakeRefs::default().with_local("topic", "c1");
        let resolved = resolve_ref("topic", &refs);
        assert_eq!(resolved.query_ref, "topic");
        assert!(!resolved.used_remote);
    }

    #[test]
    fn remote_only_branch_uses_remote() {
        let refs = FakeRefs::default().with_remote("main", "c1");
        let resolved = resolve_ref("main", &refs);
        assert_eq!(
            resolved,
            ResolvedRef {
                query_ref: "origin/main".to_string(),
                used_remote: true,
            }
        );
    }

    #[test]
    fn identical_tips_prefer_remote() {
        let refs = FakeRefs::default()
            .with_local("main", "c1")
            .with_remote("main", "c1");
        let resolved = resolve_ref("main", &refs);
        assert_eq!(resolved.query_ref, "origin/main");
        assert!(resolved.used_remote);
    }

    #[test]
    fn remote_ahead_wins() {
        let refs = FakeRefs::default()
            .with_local("main", "c2")
            .with_remote("main", "c9")
            .with_divergence("c1", 0, 3);
        assert!(resolve_ref("main", &refs).used_remote);
    }

    #[test]
    fn remote_ahead_wins_over_local_ahead() {
        let refs = FakeRefs::default()
            .with_local("main", "c2")
            .with_remote("main", "c9")
            .with_divergence("c1", 5, 1);
        assert!(resolve_ref("main", &refs).used_remote);
    }

    #[test]
    fn local_ahead_alone_wins() {
        let refs = FakeRefs::default()
            .with_local("main", "c2")
            .with_remote("main", "c9")
            .with_divergence("c1", 2, 0);
        let resolved = resolve_ref("main", &refs);
        assert_eq!(resolved.query_ref, "main");
        assert!(!resolved.used_remote);
    }

    #[test]
    fn inconclusive_counts_fall_back_to_remote() {
        let refs = FakeRefs::default()
            .with_local("main", "c2")
            .with_remote("main", "c9")
            .with_divergence("c1", 0, 0);
        assert!(resolve_ref("main", &refs).used_remote);
    }

    #[test]
    fn failing_count_queries_fall_back_to_remote() {
        let mut refs = FakeRefs::default()
            .with_local("main", "c2")
            .with_remote("main", "c9")
            .with_divergence("c1", 5, 5);
        refs.counts_fail = true;
        assert!(resolve_ref("main", &refs).used_remote);
    }

    #[test]
    fn missing_ancestor_falls_back_to_remote() {
        let refs = FakeRefs::default()
            .with_local("main", "c2")
            .with_remote("main", "c9");
        assert!(resolve_ref("main", &refs).used_remote);
    }
}
