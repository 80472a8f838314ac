use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use dirs::config_dir;
use serde::Deserialize;

use crate::git::Deadlines;
use crate::keys::{KeyMap, KeyOverrides};

#[derive(Parser, Debug)]
#[command(name = "gst", about = "Interactive status/stage/commit view for a git working tree")]
pub struct Args {
    /// Repository working directory (defaults to the current directory)
    pub dir: Option<PathBuf>,
}

impl Args {
    pub fn working_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Optional settings read from `config.json` under the platform config
/// directory. Everything has a default; the file may be absent entirely.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    pub debug: Option<bool>,
    pub read_timeout_secs: Option<u64>,
    pub commit_timeout_secs: Option<u64>,
    pub remote_timeout_secs: Option<u64>,
    pub keys: Option<KeyOverrides>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn config_path() -> PathBuf {
        config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gst")
            .join("config.json")
    }

    /// Per-class operation deadlines. The defaults match the interactive
    /// feel the tool is tuned for; network-bound operations get more room.
    pub fn deadlines(&self) -> Deadlines {
        let defaults = Deadlines::default();
        Deadlines {
            read: self
                .read_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.read),
            commit: self
                .commit_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.commit),
            remote: self
                .remote_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.remote),
        }
    }

    pub fn keymap(&self) -> Result<KeyMap> {
        match &self.keys {
            Some(overrides) => KeyMap::with_overrides(overrides),
            None => Ok(KeyMap::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Key;

    #[test]
    fn test_default_config_uses_default_deadlines() {
        let config = Config::default();
        let deadlines = config.deadlines();
        assert_eq!(deadlines.read, Duration::from_secs(5));
        assert_eq!(deadlines.commit, Duration::from_secs(10));
        assert_eq!(deadlines.remote, Duration::from_secs(30));
    }

    #[test]
    fn test_deadline_overrides() {
        let config: Config =
            serde_json::from_str(r#"{"read_timeout_secs": 2, "remote_timeout_secs": 120}"#)
                .unwrap();
        let deadlines = config.deadlines();
        assert_eq!(deadlines.read, Duration::from_secs(2));
        assert_eq!(deadlines.commit, Duration::from_secs(10));
        assert_eq!(deadlines.remote, Duration::from_secs(120));
    }

    #[test]
    fn test_key_overrides_from_json() {
        let config: Config =
            serde_json::from_str(r#"{"keys": {"stage": ["s"], "quit": ["x", "ctrl+c"]}}"#).unwrap();
        let keymap = config.keymap().unwrap();
        assert_eq!(keymap.stage, vec![Key::char('s')]);
        assert_eq!(keymap.quit, vec![Key::char('x'), Key::ctrl('c')]);
    }

    #[test]
    fn test_args_default_working_dir() {
        let args = Args { dir: None };
        assert_eq!(args.working_dir(), PathBuf::from("."));
    }
}
