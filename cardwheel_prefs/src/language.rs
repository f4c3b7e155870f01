// Copyright 2026 the Cardwheel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The enumerated language domain.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A language a deck face can display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// English (`en`).
    #[default]
    #[serde(rename = "en")]
    English,
    /// French (`fr`).
    #[serde(rename = "fr")]
    French,
    /// Spanish (`es`).
    #[serde(rename = "es")]
    Spanish,
}

impl Language {
    /// All supported languages, in display order.
    pub const ALL: [Self; 3] = [Self::English, Self::French, Self::Spanish];

    /// Returns the two-letter wire code (`en`, `fr`, `es`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::French => "fr",
            Self::Spanish => "es",
        }
    }

    /// Parses a wire code. Returns `None` for unknown codes; callers decide
    /// the fallback (the preference store falls back to English).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::English),
            "fr" => Some(Self::French),
            "es" => Some(Self::Spanish),
            _ => None,
        }
    }

    /// Returns the bundled flag asset path for this language, relative to
    /// the application's asset root.
    #[must_use]
    pub const fn flag_asset(self) -> &'static str {
        match self {
            Self::English => "flags/en.svg",
            Self::French => "flags/fr.svg",
            Self::Spanish => "flags/es.svg",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::English => "English",
            Self::French => "French",
            Self::Spanish => "Spanish",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(Language::from_code("de"), None);
        assert_eq!(Language::from_code(""), None);
        // Codes are case-sensitive on the wire.
        assert_eq!(Language::from_code("EN"), None);
    }

    #[test]
    fn flag_assets_follow_codes() {
        for lang in Language::ALL {
            assert!(lang.flag_asset().ends_with(&format!("{}.svg", lang.code())));
        }
    }

    #[test]
    fn serde_uses_wire_codes() {
        let json = serde_json::to_string(&Language::Spanish).unwrap();
        assert_eq!(json, "\"es\"");
        let back: Language = serde_json::from_str("\"fr\"").unwrap();
        assert_eq!(back, Language::French);
    }
}
