use std::fmt;
use std::str::FromStr;

use color_eyre::eyre::{Result, eyre};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

/// One concrete key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl Key {
    pub fn char(c: char) -> Self {
        let mods = if c.is_ascii_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::NONE
        };
        Self {
            code: KeyCode::Char(c),
            mods,
        }
    }

    pub fn code(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            mods: KeyModifiers::CONTROL,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.code == self.code && event.modifiers == self.mods
    }
}

impl FromStr for Key {
    type Err = color_eyre::eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix("ctrl+") {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => return Ok(Key::ctrl(c)),
                _ => return Err(eyre!("invalid key binding: {s:?}")),
            }
        }
        match s {
            "tab" => Ok(Key::code(KeyCode::Tab)),
            "space" => Ok(Key::code(KeyCode::Char(' '))),
            "enter" => Ok(Key::code(KeyCode::Enter)),
            "esc" => Ok(Key::code(KeyCode::Esc)),
            "up" => Ok(Key::code(KeyCode::Up)),
            "down" => Ok(Key::code(KeyCode::Down)),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Key::char(c)),
                    _ => Err(eyre!("invalid key binding: {s:?}")),
                }
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(KeyModifiers::CONTROL) {
            write!(f, "ctrl+")?;
        }
        match self.code {
            KeyCode::Char(' ') => write!(f, "space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Tab => write!(f, "tab"),
            KeyCode::Enter => write!(f, "enter"),
            KeyCode::Esc => write!(f, "esc"),
            KeyCode::Up => write!(f, "up"),
            KeyCode::Down => write!(f, "down"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Key bindings for the interactive surface. Defaults are documented in the
/// help line; individual actions can be rebound from the config file.
#[derive(Debug, Clone)]
pub struct KeyMap {
    pub quit: Vec<Key>,
    pub refresh: Vec<Key>,
    pub stage: Vec<Key>,
    pub unstage: Vec<Key>,
    pub commit: Vec<Key>,
    pub push: Vec<Key>,
    pub pull: Vec<Key>,
    pub up: Vec<Key>,
    pub down: Vec<Key>,
    pub toggle_diff: Vec<Key>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            quit: vec![Key::char('q'), Key::ctrl('c')],
            refresh: vec![Key::char('r')],
            stage: vec![Key::code(KeyCode::Char(' '))],
            unstage: vec![Key::char('u')],
            commit: vec![Key::char('c')],
            push: vec![Key::char('P')],
            pull: vec![Key::char('f')],
            up: vec![Key::char('k'), Key::code(KeyCode::Up)],
            down: vec![Key::char('j'), Key::code(KeyCode::Down)],
            toggle_diff: vec![Key::code(KeyCode::Tab)],
        }
    }
}

/// Optional per-action rebinds, as key name strings in the config file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct KeyOverrides {
    pub quit: Option<Vec<String>>,
    pub refresh: Option<Vec<String>>,
    pub stage: Option<Vec<String>>,
    pub unstage: Option<Vec<String>>,
    pub commit: Option<Vec<String>>,
    pub push: Option<Vec<String>>,
    pub pull: Option<Vec<String>>,
    pub up: Option<Vec<String>>,
    pub down: Option<Vec<String>>,
    pub toggle_diff: Option<Vec<String>>,
}

impl KeyMap {
    pub fn with_overrides(overrides: &KeyOverrides) -> Result<Self> {
        let mut keymap = Self::default();
        apply(&mut keymap.quit, &overrides.quit)?;
        apply(&mut keymap.refresh, &overrides.refresh)?;
        apply(&mut keymap.stage, &overrides.stage)?;
        apply(&mut keymap.unstage, &overrides.unstage)?;
        apply(&mut keymap.commit, &overrides.commit)?;
        apply(&mut keymap.push, &overrides.push)?;
        apply(&mut keymap.pull, &overrides.pull)?;
        apply(&mut keymap.up, &overrides.up)?;
        apply(&mut keymap.down, &overrides.down)?;
        apply(&mut keymap.toggle_diff, &overrides.toggle_diff)?;
        Ok(keymap)
    }

    pub fn matches(&self, binding: &[Key], event: &KeyEvent) -> bool {
        binding.iter().any(|key| key.matches(event))
    }

    /// Footer help line, built from the first binding of each action.
    pub fn help_line(&self) -> String {
        format!(
            "{}/{}: move  {}: stage  {}: unstage  {}: commit  {}: push  {}: pull  {}: diff  {}: refresh  {}: quit",
            first(&self.down),
            first(&self.up),
            first(&self.stage),
            first(&self.unstage),
            first(&self.commit),
            first(&self.push),
            first(&self.pull),
            first(&self.toggle_diff),
            first(&self.refresh),
            first(&self.quit),
        )
    }
}

fn first(binding: &[Key]) -> String {
    binding.first().map(Key::to_string).unwrap_or_default()
}

fn apply(binding: &mut Vec<Key>, names: &Option<Vec<String>>) -> Result<()> {
    if let Some(names) = names {
        *binding = names
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<Key>>>()?;
    }
    Ok(())
}
