use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::runner::{self, CommandOutput, ExecError};

#[derive(Debug, Error)]
pub enum GitError {
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),
}

/// Status of an entry in the short-format status output, derived from the
/// two-character porcelain prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Modified,
    Added,
    Deleted,
    Renamed,
    Copied,
    TypeChanged,
    Unmerged,
    Untracked,
}

impl StatusCode {
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        let mut chars = prefix.chars();
        let x = chars.next()?;
        let y = chars.next()?;

        if x == '?' || y == '?' {
            return Some(StatusCode::Untracked);
        }
        if x == 'U' || y == 'U' || (x == 'A' && y == 'A') || (x == 'D' && y == 'D') {
            return Some(StatusCode::Unmerged);
        }

        // Index column wins; fall back to the worktree column.
        let dominant = if x != ' ' { x } else { y };
        match dominant {
            'M' => Some(StatusCode::Modified),
            'A' => Some(StatusCode::Added),
            'D' => Some(StatusCode::Deleted),
            'R' => Some(StatusCode::Renamed),
            'C' => Some(StatusCode::Copied),
            'T' => Some(StatusCode::TypeChanged),
            _ => None,
        }
    }

    /// One-character display marker. Untracked entries show as `-` rather
    /// than the raw `??` prefix.
    pub fn label(&self) -> &'static str {
        match self {
            StatusCode::Modified => "M",
            StatusCode::Added => "A",
            StatusCode::Deleted => "D",
            StatusCode::Renamed => "R",
            StatusCode::Copied => "C",
            StatusCode::TypeChanged => "T",
            StatusCode::Unmerged => "U",
            StatusCode::Untracked => "-",
        }
    }
}

/// One changed file as reported by a status snapshot. The path is the
/// identity key; the whole list is replaced on every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub code: StatusCode,
    pub path: String,
}

/// Per-class operation deadlines, configurable via the config file.
#[derive(Debug, Clone, Copy)]
pub struct Deadlines {
    pub read: Duration,
    pub commit: Duration,
    pub remote: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(5),
            commit: Duration::from_secs(10),
            remote: Duration::from_secs(30),
        }
    }
}

/// Thin wrappers over the external `git` binary, one invocation per
/// operation. Output normalization stops at status parsing; everything else
/// passes through unchanged.
#[derive(Debug, Clone)]
pub struct GitClient {
    dir: PathBuf,
    deadlines: Deadlines,
}

impl GitClient {
    pub fn new(dir: PathBuf, deadlines: Deadlines) -> Self {
        Self { dir, deadlines }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    async fn run(&self, args: &[&str], deadline: Duration) -> Result<CommandOutput, GitError> {
        Ok(runner::execute(&self.dir, "git", args, deadline).await?)
    }

    pub async fn status(&self) -> Result<Vec<FileEntry>, GitError> {
        let out = self.run(&["status", "--short"], self.deadlines.read).await?;
        parse_status(&out.stdout)
    }

    pub async fn stage(&self, path: &str) -> Result<(), GitError> {
        self.run(&["add", "--", path], self.deadlines.read).await?;
        Ok(())
    }

    pub async fn unstage(&self, path: &str) -> Result<(), GitError> {
        self.run(&["restore", "--staged", "--", path], self.deadlines.read)
            .await?;
        Ok(())
    }

    /// The message passes through unmodified; the empty-after-trim check
    /// belongs to the event loop.
    pub async fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run(&["commit", "-m", message], self.deadlines.commit)
            .await?;
        Ok(())
    }

    pub async fn push(&self) -> Result<(), GitError> {
        self.run(&["push"], self.deadlines.remote).await?;
        Ok(())
    }

    /// Fast-forward only. A refused fast-forward comes back as a non-zero
    /// exit and surfaces to the operator like any other failure.
    pub async fn pull(&self) -> Result<(), GitError> {
        self.run(&["pull", "--ff-only"], self.deadlines.remote).await?;
        Ok(())
    }

    pub async fn diff(&self, path: &str, staged: bool) -> Result<String, GitError> {
        let out = if staged {
            self.run(&["diff", "--cached", "--", path], self.deadlines.read)
                .await?
        } else {
            self.run(&["diff", "--", path], self.deadlines.read).await?
        };
        Ok(out.stdout)
    }
}

/// Parse short-format status output into entries. Whitespace-only output
/// yields zero entries, never a single blank one.
pub fn parse_status(output: &str) -> Result<Vec<FileEntry>, GitError> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_status_line)
        .collect()
}

/// Parse one `XY path` status line: two status characters, one separator,
/// then the path verbatim from offset 3. Surrounding whitespace is trimmed
/// but internal spaces are preserved; git quotes unusual paths, so
/// surrounding double quotes are stripped.
pub fn parse_status_line(raw: &str) -> Result<FileEntry, GitError> {
    let prefix = raw
        .get(..2)
        .ok_or_else(|| GitError::MalformedStatusLine(raw.to_string()))?;
    let code = StatusCode::from_prefix(prefix)
        .ok_or_else(|| GitError::MalformedStatusLine(raw.to_string()))?;

    let path = raw
        .get(3..)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| GitError::MalformedStatusLine(raw.to_string()))?;
    let path = unquote(path);

    Ok(FileEntry {
        code,
        path: path.to_string(),
    })
}

fn unquote(path: &str) -> &str {
    if path.len() >= 2 && path.starts_with('"') && path.ends_with('"') {
        &path[1..path.len() - 1]
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_empty_output() {
        assert!(parse_status("").unwrap().is_empty());
        assert!(parse_status("   \n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_status_line_modified() {
        let entry = parse_status_line("M  a.txt").unwrap();
        assert_eq!(entry.code, StatusCode::Modified);
        assert_eq!(entry.path, "a.txt");
    }

    #[test]
    fn test_parse_status_line_worktree_modified() {
        let entry = parse_status_line(" M src/main.rs").unwrap();
        assert_eq!(entry.code, StatusCode::Modified);
        assert_eq!(entry.path, "src/main.rs");
    }

    #[test]
    fn test_parse_status_line_untracked_label() {
        let entry = parse_status_line("?? b.txt").unwrap();
        assert_eq!(entry.code, StatusCode::Untracked);
        assert_eq!(entry.code.label(), "-");
        assert_eq!(entry.path, "b.txt");
    }

    #[test]
    fn test_parse_status_line_keeps_internal_spaces() {
        let entry = parse_status_line(" M my notes file.txt  ").unwrap();
        assert_eq!(entry.path, "my notes file.txt");
    }

    #[test]
    fn test_parse_status_line_strips_quotes() {
        let entry = parse_status_line("?? \"weird name.txt\"").unwrap();
        assert_eq!(entry.path, "weird name.txt");
    }

    #[test]
    fn test_parse_status_line_too_short() {
        assert!(parse_status_line("M").is_err());
        assert!(parse_status_line("M  ").is_err());
    }

    #[test]
    fn test_parse_status_scenario() {
        let entries = parse_status("M  a.txt\n?? b.txt\n").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].code.label(), "M");
        assert_eq!(entries[0].path, "a.txt");
        assert_eq!(entries[1].code.label(), "-");
        assert_eq!(entries[1].path, "b.txt");
    }

    #[test]
    fn test_status_code_unmerged() {
        assert_eq!(StatusCode::from_prefix("UU"), Some(StatusCode::Unmerged));
        assert_eq!(StatusCode::from_prefix("AA"), Some(StatusCode::Unmerged));
    }

    #[test]
    fn test_status_code_index_column_wins() {
        assert_eq!(StatusCode::from_prefix("RM"), Some(StatusCode::Renamed));
        assert_eq!(StatusCode::from_prefix(" T"), Some(StatusCode::TypeChanged));
    }

    #[test]
    fn test_deadlines_defaults() {
        let deadlines = Deadlines::default();
        assert_eq!(deadlines.read, Duration::from_secs(5));
        assert_eq!(deadlines.commit, Duration::from_secs(10));
        assert_eq!(deadlines.remote, Duration::from_secs(30));
    }
}
