pub mod actions;
pub mod diff;
pub mod history;
pub mod refs;
pub mod repository;

pub use repository::{GitRepository, SharedRepo};
