//! Display language selection and the placeholder translator.
//!
//! There is no real localization here: non-English languages only get a
//! two-letter tag prefixed to the English sentence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
    Es,
    Hi,
}

impl Language {
    /// Lenient parse: case-insensitive, region subtags ignored (`fr-CA`,
    /// `es_MX`), anything unrecognized is English.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "fr" => Self::Fr,
            "es" => Self::Es,
            "hi" => Self::Hi,
            _ => Self::En,
        }
    }

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
            Self::Es => "es",
            Self::Hi => "hi",
        }
    }

    fn prefix(self) -> Option<&'static str> {
        match self {
            Self::En => None,
            Self::Fr => Some("FR: "),
            Self::Es => Some("ES: "),
            Self::Hi => Some("HI: "),
        }
    }

    /// Renders `sentence` for this language.
    #[must_use]
    pub fn render(self, sentence: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{prefix}{sentence}"),
            None => sentence.to_owned(),
        }
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Placeholder translation: `"fr"`, `"es"` and `"hi"` prefix the sentence
/// with `"FR: "`, `"ES: "` or `"HI: "`; `"en"` and unknown tags return it
/// unchanged.
#[must_use]
pub fn translate(sentence: &str, lang_tag: &str) -> String {
    Language::from_tag(lang_tag).render(sentence)
}
