use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;

use crate::git::FileEntry;
use crate::keys::KeyMap;
use crate::worker::TaskEvent;

/// A task the event loop should issue in response to a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadStatus,
    LoadDiff { path: String, staged: bool },
    Stage { path: String },
    Unstage { path: String },
    Commit { message: String },
    Push,
    Pull,
    Quit,
}

/// Single source of truth for what is rendered. Owned by the event loop;
/// the renderer only reads it. All mutation goes through `handle_key` and
/// `apply_event`, so no locking is needed.
#[derive(Debug)]
pub struct App {
    entries: Vec<FileEntry>,
    selected: usize,
    diff_text: Option<String>,
    show_diff: bool,
    commit_input: String,
    editing_commit: bool,
    loading: bool,
    last_error: Option<String>,
    keymap: KeyMap,
}

impl App {
    pub fn new(keymap: KeyMap) -> Self {
        Self {
            entries: Vec::new(),
            selected: 0,
            diff_text: None,
            show_diff: false,
            commit_input: String::new(),
            editing_commit: false,
            // The initial status load is issued right after construction.
            loading: true,
            last_error: None,
            keymap,
        }
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_path(&self) -> Option<&str> {
        self.entries.get(self.selected).map(|e| e.path.as_str())
    }

    pub fn diff_text(&self) -> Option<&str> {
        self.diff_text.as_deref()
    }

    pub fn diff_visible(&self) -> bool {
        self.show_diff
    }

    pub fn is_editing_commit(&self) -> bool {
        self.editing_commit
    }

    pub fn commit_input(&self) -> &str {
        &self.commit_input
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// Pure key transition: mutates view state and names the task to issue,
    /// if any. While composing a commit message all keys are routed to the
    /// message buffer.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if self.editing_commit {
            return self.handle_commit_key(key);
        }

        if self.keymap.matches(&self.keymap.quit, &key) {
            log::info!("user requested quit");
            Some(Command::Quit)
        } else if self.keymap.matches(&self.keymap.refresh, &key) {
            self.loading = true;
            Some(Command::LoadStatus)
        } else if self.keymap.matches(&self.keymap.down, &key) {
            self.move_selection(1)
        } else if self.keymap.matches(&self.keymap.up, &key) {
            self.move_selection(-1)
        } else if self.keymap.matches(&self.keymap.toggle_diff, &key) {
            self.toggle_diff()
        } else if self.keymap.matches(&self.keymap.stage, &key) {
            self.selected_path()
                .map(|path| Command::Stage { path: path.to_string() })
        } else if self.keymap.matches(&self.keymap.unstage, &key) {
            self.selected_path()
                .map(|path| Command::Unstage { path: path.to_string() })
        } else if self.keymap.matches(&self.keymap.commit, &key) {
            self.editing_commit = true;
            None
        } else if self.keymap.matches(&self.keymap.push, &key) {
            Some(Command::Push)
        } else if self.keymap.matches(&self.keymap.pull, &key) {
            Some(Command::Pull)
        } else {
            None
        }
    }

    fn handle_commit_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Enter => {
                let message = self.commit_input.trim().to_string();
                if message.is_empty() {
                    // A whitespace-only message never issues a commit task.
                    return None;
                }
                self.commit_input.clear();
                self.editing_commit = false;
                Some(Command::Commit { message })
            }
            KeyCode::Esc => {
                self.editing_commit = false;
                None
            }
            KeyCode::Backspace => {
                self.commit_input.pop();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.commit_input.push(c);
                None
            }
            _ => None,
        }
    }

    fn move_selection(&mut self, delta: isize) -> Option<Command> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        let next = self
            .selected
            .saturating_add_signed(delta)
            .min(last);
        if next == self.selected {
            return None;
        }
        self.selected = next;
        // The previous diff no longer matches the selection.
        self.diff_text = None;
        if self.show_diff {
            self.loading = true;
            self.selected_path().map(|path| Command::LoadDiff {
                path: path.to_string(),
                staged: false,
            })
        } else {
            None
        }
    }

    fn toggle_diff(&mut self) -> Option<Command> {
        self.show_diff = !self.show_diff;
        if self.show_diff {
            // Capture the path now; the completion event is checked against
            // the selection current at delivery time.
            self.diff_text = None;
            if let Some(path) = self.selected_path().map(str::to_string) {
                self.loading = true;
                return Some(Command::LoadDiff {
                    path,
                    staged: false,
                });
            }
            None
        } else {
            self.diff_text = None;
            None
        }
    }

    /// Merge one task completion event. Events arrive in delivery order and
    /// each merge only touches the fields it owns, so merges of unrelated
    /// tasks commute.
    pub fn apply_event(&mut self, event: TaskEvent) -> Option<Command> {
        match event {
            TaskEvent::Status(Ok(entries)) => {
                self.entries = entries;
                self.clamp_selection();
                self.loading = false;
                // Re-arm the diff pane if an invalidation left it empty.
                if self.show_diff && self.diff_text.is_none() {
                    if let Some(path) = self.selected_path().map(str::to_string) {
                        self.loading = true;
                        return Some(Command::LoadDiff {
                            path,
                            staged: false,
                        });
                    }
                }
                None
            }
            TaskEvent::Status(Err(err)) => {
                self.loading = false;
                self.record_error(err.to_string());
                None
            }
            TaskEvent::Diff { path, result } => {
                self.loading = false;
                if !self.show_diff || self.selected_path() != Some(path.as_str()) {
                    // Selection moved on while the fetch was in flight.
                    debug!("discarding stale diff for {path}");
                    return None;
                }
                match result {
                    Ok(text) => {
                        let text = if text.trim().is_empty() {
                            "(no diff)".to_string()
                        } else {
                            text
                        };
                        self.diff_text = Some(text);
                    }
                    Err(err) => self.record_error(err.to_string()),
                }
                None
            }
            TaskEvent::Op { kind, result } => {
                if let Err(err) = result {
                    self.record_error(format!("{}: {err}", kind.label()));
                }
                // The displayed list and diff may both be stale now; always
                // re-query rather than patching state locally.
                self.diff_text = None;
                self.loading = true;
                Some(Command::LoadStatus)
            }
        }
    }

    fn clamp_selection(&mut self) {
        if self.entries.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.entries.len() {
            self.selected = self.entries.len() - 1;
        }
    }

    fn record_error(&mut self, message: String) {
        log::error!("{message}");
        // Only the most recent failure is shown.
        self.last_error = Some(message);
    }
}
