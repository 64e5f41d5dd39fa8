use crate::error::{FarmCastError, Result};
use std::collections::HashMap;
use std::path::Path;

const BUNDLED_CATALOG: &str = include_str!("../assets/translations.yaml");

/// Display languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Marathi,
    Tamil,
    Telugu,
    Bengali,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Marathi => "mr",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Bengali => "bn",
        }
    }

    /// Name of the language in its own script
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिन्दी",
            Language::Marathi => "मराठी",
            Language::Tamil => "தமிழ்",
            Language::Telugu => "తెలుగు",
            Language::Bengali => "বাংলা",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "hi" | "hindi" => Some(Language::Hindi),
            "mr" | "marathi" => Some(Language::Marathi),
            "ta" | "tamil" => Some(Language::Tamil),
            "te" | "telugu" => Some(Language::Telugu),
            "bn" | "bengali" => Some(Language::Bengali),
            _ => None,
        }
    }

    pub fn all() -> &'static [Language] {
        &[
            Language::English,
            Language::Hindi,
            Language::Marathi,
            Language::Tamil,
            Language::Telugu,
            Language::Bengali,
        ]
    }

    /// Next language in display order, wrapping around
    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|l| l == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Translation catalog: semantic key -> language code -> text
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    /// The catalog shipped with the binary
    pub fn bundled() -> Result<Self> {
        Self::from_yaml(BUNDLED_CATALOG)
    }

    /// Bundled catalog with an optional override file merged on top
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut catalog = Self::bundled()?;
        if let Some(path) = override_path {
            let content = std::fs::read_to_string(path).map_err(|e| {
                FarmCastError::Config(format!(
                    "Failed to read translations {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let extra = Self::from_yaml(&content)?;
            if extra.is_empty() {
                tracing::warn!(path = %path.display(), "Translation override has no entries");
            }
            tracing::info!(
                path = %path.display(),
                keys = extra.len(),
                "Merged translation overrides"
            );
            catalog.merge(extra);
        }
        Ok(catalog)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let entries: HashMap<String, HashMap<String, String>> = serde_yaml::from_str(content)?;
        Ok(Self { entries })
    }

    /// Entries in `other` replace matching key/language pairs
    pub fn merge(&mut self, other: Catalog) {
        for (key, translations) in other.entries {
            self.entries.entry(key).or_default().extend(translations);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Text for `key`, falling back to English and then to the key itself
    pub fn get<'a>(&'a self, key: &'a str, language: Language) -> &'a str {
        let Some(translations) = self.entries.get(key) else {
            return key;
        };
        translations
            .get(language.code())
            .or_else(|| translations.get(Language::English.code()))
            .map(String::as_str)
            .unwrap_or(key)
    }
}
