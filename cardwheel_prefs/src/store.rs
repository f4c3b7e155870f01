// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-file preference store with staged edits.
//!
//! The on-disk format is a flat JSON object with optional string slots:
//!
//! ```json
//! { "topLang": "en", "botLang": "fr" }
//! ```
//!
//! Absent slots take per-slot defaults (English on top, French on the
//! bottom) and unknown codes decode as English, so a file written by a
//! newer version never makes an older reader fail. Raw slot values are
//! preserved across commits — committing one slot does not rewrite what
//! the store could not decode in the other.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::Language;

/// Errors from loading or persisting preferences.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// The per-user config directory could not be determined.
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    /// Reading or writing the preference file failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The preference file exists but is not valid JSON.
    #[error("malformed preference file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raw slot values as stored on disk.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PrefValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    top_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bot_lang: Option<String>,
}

/// The two language selections of a bilingual deck.
///
/// Reads are infallible once the store is open; writes go through the
/// staged [`Editor`] returned by [`edit`](Self::edit).
#[derive(Debug)]
pub struct PrefStore {
    path: PathBuf,
    values: PrefValues,
}

impl PrefStore {
    /// Returns the default preference file path inside the per-user config
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::ConfigDirNotFound`] if the platform reports no
    /// home directory.
    pub fn default_path() -> Result<PathBuf, PrefsError> {
        let dirs =
            ProjectDirs::from("rs", "cardwheel", "cardwheel").ok_or(PrefsError::ConfigDirNotFound)?;
        Ok(dirs.config_dir().join("prefs.json"))
    }

    /// Opens the store at `path`.
    ///
    /// A missing file yields defaults; that is the normal first-run case.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => PrefValues::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    /// Opens the store at `path`, falling back to defaults on any error.
    ///
    /// Failures are logged, not returned; use [`open`](Self::open) when the
    /// caller wants to surface them.
    #[must_use]
    pub fn open_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("unreadable preference file {}: {e}", path.display());
                Self {
                    path,
                    values: PrefValues::default(),
                }
            }
        }
    }

    /// Returns the path this store reads from and commits to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the top (prompt) language. Defaults to English; unknown
    /// codes decode as English.
    #[must_use]
    pub fn top_language(&self) -> Language {
        Self::decode_slot(self.values.top_lang.as_deref(), Language::English)
    }

    /// Returns the bottom (answer) language. Defaults to French; unknown
    /// codes decode as English.
    #[must_use]
    pub fn bottom_language(&self) -> Language {
        Self::decode_slot(self.values.bot_lang.as_deref(), Language::French)
    }

    /// Starts a staged edit.
    ///
    /// Nothing reaches disk (or the store's own getters) until
    /// [`Editor::commit`] is called; dropping the editor discards the
    /// staged values.
    #[must_use]
    pub fn edit(&mut self) -> Editor<'_> {
        Editor {
            store: self,
            top: None,
            bot: None,
        }
    }

    fn decode_slot(raw: Option<&str>, absent: Language) -> Language {
        match raw {
            None => absent,
            Some(code) => Language::from_code(code).unwrap_or_default(),
        }
    }

    /// Writes the current values to disk, atomically.
    fn persist(&self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        // Write-then-rename so a crash mid-write never truncates the file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// A staged preference edit.
///
/// Created by [`PrefStore::edit`]. Staged values are only applied and
/// persisted by [`commit`](Self::commit).
#[must_use = "staged preference edits are discarded unless committed"]
#[derive(Debug)]
pub struct Editor<'a> {
    store: &'a mut PrefStore,
    top: Option<Language>,
    bot: Option<Language>,
}

impl Editor<'_> {
    /// Stages the top (prompt) language.
    pub fn set_top_language(mut self, language: Language) -> Self {
        self.top = Some(language);
        self
    }

    /// Stages the bottom (answer) language.
    pub fn set_bottom_language(mut self, language: Language) -> Self {
        self.bot = Some(language);
        self
    }

    /// Applies the staged values and persists the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference file cannot be written; staged
    /// values are still applied in memory in that case.
    pub fn commit(self) -> Result<(), PrefsError> {
        if let Some(lang) = self.top {
            self.store.values.top_lang = Some(lang.code().to_owned());
        }
        if let Some(lang) = self.bot {
            self.store.values.bot_lang = Some(lang.code().to_owned());
        }
        self.store.persist()
    }
}
