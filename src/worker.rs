use log::debug;
use tokio::sync::mpsc;

use crate::app::Command;
use crate::git::{FileEntry, GitClient, GitError};

/// Mutating or remote operation kinds, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Stage,
    Unstage,
    Commit,
    Push,
    Pull,
}

impl OpKind {
    pub fn label(&self) -> &'static str {
        match self {
            OpKind::Stage => "stage",
            OpKind::Unstage => "unstage",
            OpKind::Commit => "commit",
            OpKind::Push => "push",
            OpKind::Pull => "pull",
        }
    }
}

/// Exactly one event per spawned task, delivered when it completes.
#[derive(Debug)]
pub enum TaskEvent {
    Status(Result<Vec<FileEntry>, GitError>),
    /// Carries the path captured when the fetch was issued so the consumer
    /// can drop results that no longer match the selection.
    Diff {
        path: String,
        result: Result<String, GitError>,
    },
    Op {
        kind: OpKind,
        result: Result<(), GitError>,
    },
}

/// Spawns git operations as independent tokio tasks and funnels their
/// completion events into a single queue. The event loop drains the queue
/// with `try_next_event` between renders; nothing here blocks.
pub struct GitTasks {
    client: GitClient,
    tx: mpsc::UnboundedSender<TaskEvent>,
    rx: mpsc::UnboundedReceiver<TaskEvent>,
}

impl GitTasks {
    pub fn new(client: GitClient) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { client, tx, rx }
    }

    pub fn try_next_event(&mut self) -> Option<TaskEvent> {
        self.rx.try_recv().ok()
    }

    pub fn spawn_status(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.status().await;
            let _ = tx.send(TaskEvent::Status(result));
        });
    }

    pub fn spawn_diff(&self, path: String, staged: bool) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.diff(&path, staged).await;
            let _ = tx.send(TaskEvent::Diff { path, result });
        });
    }

    pub fn spawn_stage(&self, path: String) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.stage(&path).await;
            let _ = tx.send(TaskEvent::Op {
                kind: OpKind::Stage,
                result,
            });
        });
    }

    pub fn spawn_unstage(&self, path: String) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.unstage(&path).await;
            let _ = tx.send(TaskEvent::Op {
                kind: OpKind::Unstage,
                result,
            });
        });
    }

    pub fn spawn_commit(&self, message: String) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.commit(&message).await;
            let _ = tx.send(TaskEvent::Op {
                kind: OpKind::Commit,
                result,
            });
        });
    }

    pub fn spawn_push(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.push().await;
            let _ = tx.send(TaskEvent::Op {
                kind: OpKind::Push,
                result,
            });
        });
    }

    pub fn spawn_pull(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.pull().await;
            let _ = tx.send(TaskEvent::Op {
                kind: OpKind::Pull,
                result,
            });
        });
    }

    /// Issue the task a key transition asked for.
    pub fn dispatch(&self, command: Command) {
        debug!("dispatch: {command:?}");
        match command {
            Command::LoadStatus => self.spawn_status(),
            Command::LoadDiff { path, staged } => self.spawn_diff(path, staged),
            Command::Stage { path } => self.spawn_stage(path),
            Command::Unstage { path } => self.spawn_unstage(path),
            Command::Commit { message } => self.spawn_commit(message),
            Command::Push => self.spawn_push(),
            Command::Pull => self.spawn_pull(),
            // Quit never reaches the worker; the loop handles it.
            Command::Quit => {}
        }
    }
}
