//! Temporary-repository fixture for backend tests.
//!
//! Commits get strictly increasing author/committer times so that
//! time-sorted listings are deterministic.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::cell::Cell;
use std::fs;
use std::path::Path;

use git2::build::CheckoutBuilder;
use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

use gitscope::git::GitRepository;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
    clock: Cell<i64>,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temporary directory");
        let repo = Repository::init(dir.path()).expect("Failed to initialize git repository");

        let mut config = repo.config().expect("Failed to get repository config");
        config
            .set_str("user.name", "Test User")
            .expect("Failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set user.email");

        Self {
            dir,
            repo,
            clock: Cell::new(1_700_000_000),
        }
    }

    /// Open the fixture through the application wrapper.
    pub fn open(&self) -> GitRepository {
        GitRepository::open(self.dir.path()).expect("Failed to open fixture repository")
    }

    pub fn head_branch_name(&self) -> String {
        self.repo
            .head()
            .expect("HEAD is unborn")
            .shorthand()
            .expect("branch name is not UTF-8")
            .to_string()
    }

    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> Oid {
        self.commit_file_by(path, content, message, "Alice Example", "alice@example.com")
    }

    pub fn commit_file_by(
        &self,
        path: &str,
        content: &str,
        message: &str,
        name: &str,
        email: &str,
    ) -> Oid {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&full_path, content).expect("Failed to write file");

        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(path)).expect("Failed to add path");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let when = Time::new(self.tick(), 0);
        let sig = Signature::new(name, email, &when).expect("Failed to create signature");

        let parent = self.repo.head().ok().map(|h| {
            h.peel_to_commit().expect("HEAD does not point to a commit")
        });
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a local branch at the given commit, overwriting any
    /// existing branch of that name.
    pub fn branch_at(&self, name: &str, oid: Oid) {
        let commit = self.repo.find_commit(oid).expect("Failed to find commit");
        self.repo
            .branch(name, &commit, true)
            .expect("Failed to create branch");
    }

    pub fn checkout(&self, name: &str) {
        self.repo
            .set_head(&format!("refs/heads/{name}"))
            .expect("Failed to set HEAD");
        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        self.repo
            .checkout_head(Some(&mut checkout))
            .expect("Failed to checkout");
    }

    /// Fabricate a remote-tracking ref without a real remote.
    pub fn remote_tracking(&self, name: &str, oid: Oid) {
        self.repo
            .reference(
                &format!("refs/remotes/origin/{name}"),
                oid,
                true,
                "test remote-tracking ref",
            )
            .expect("Failed to create remote-tracking ref");
    }

    fn tick(&self) -> i64 {
        let t = self.clock.get() + 60;
        self.clock.set(t);
        t
    }
}
