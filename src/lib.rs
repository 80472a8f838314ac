// Library interface for gst; exposes the modules for integration testing.

pub mod app;
pub mod config;
pub mod git;
pub mod keys;
pub mod logging;
pub mod runner;
pub mod ui;
pub mod worker;

pub use app::{App, Command};
pub use git::{Deadlines, FileEntry, GitClient, GitError, StatusCode};
pub use keys::{Key, KeyMap};
pub use worker::{GitTasks, OpKind, TaskEvent};
