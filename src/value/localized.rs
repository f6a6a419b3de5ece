use std::{collections::BTreeMap, fmt};

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Language used when the requested translation is missing.
pub const FALLBACK_LANGUAGE: &str = "en";

/// A label available in several languages, keyed by ISO 639-1 code.
///
/// Aircraft models, airport names and cities are stored this way in a JSON
/// column, e.g. `{"en": "Boeing 777-300", "ru": "Боинг 777-300"}`.
/// Every value is validated on construction and on deserialization, so a
/// `LocalizedText` read from the database is always well formed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct LocalizedText(BTreeMap<String, String>);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocalizedTextError {
    #[error("localized text needs at least one translation")]
    Empty,
    #[error("{0:?} is not a two-letter lowercase language code")]
    InvalidLanguage(String),
    #[error("translation for {0:?} is blank")]
    BlankValue(String),
}

impl LocalizedText {
    /// Builds a label from `(language, text)` pairs.
    pub fn new<L, T>(entries: impl IntoIterator<Item = (L, T)>) -> Result<Self, LocalizedTextError>
    where
        L: Into<String>,
        T: Into<String>,
    {
        entries
            .into_iter()
            .map(|(lang, text)| (lang.into(), text.into()))
            .collect::<BTreeMap<_, _>>()
            .try_into()
    }

    /// Uses the same text for English and Russian, the two languages of the
    /// demo database.
    pub fn uniform(text: impl Into<String>) -> Result<Self, LocalizedTextError> {
        let text = text.into();
        Self::new([("en", text.clone()), ("ru", text)])
    }

    /// Returns the translation for `lang`, falling back to English and then
    /// to the first available language.
    pub fn get(&self, lang: &str) -> &str {
        self.0
            .get(lang)
            .or_else(|| self.0.get(FALLBACK_LANGUAGE))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Returns the translation for `lang` without any fallback.
    pub fn exact(&self, lang: &str) -> Option<&str> {
        self.0.get(lang).map(String::as_str)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl TryFrom<BTreeMap<String, String>> for LocalizedText {
    type Error = LocalizedTextError;

    fn try_from(entries: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        if entries.is_empty() {
            return Err(LocalizedTextError::Empty);
        }
        let mut normalized = BTreeMap::new();
        for (lang, text) in entries {
            let valid_lang = lang.len() == 2 && lang.bytes().all(|b| b.is_ascii_lowercase());
            if !valid_lang {
                return Err(LocalizedTextError::InvalidLanguage(lang));
            }
            let text = text.trim();
            if text.is_empty() {
                return Err(LocalizedTextError::BlankValue(lang));
            }
            normalized.insert(lang, text.to_string());
        }
        Ok(Self(normalized))
    }
}

impl From<LocalizedText> for BTreeMap<String, String> {
    fn from(text: LocalizedText) -> Self {
        text.0
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get(FALLBACK_LANGUAGE))
    }
}
