use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "en";

/// Locale resolved from a standard language tag such as `en`, `en_US`,
/// `pt-BR` or `de_DE_1996`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    language: String,
    country: Option<String>,
    variant: Option<String>,
}

impl Locale {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into().to_lowercase(),
            country: None,
            variant: None,
        }
    }

    /// Resolves a locale from a language tag. Blank tags resolve to the
    /// default locale.
    pub fn from_language_tag(tag: &str) -> Self {
        let mut parts = tag
            .trim()
            .split(|c| c == '_' || c == '-')
            .filter(|p| !p.is_empty());

        let language = match parts.next() {
            Some(language) => language.to_lowercase(),
            None => return Self::default(),
        };
        let country = parts.next().map(|c| c.to_uppercase());
        let variant = parts.next().map(str::to_string);

        Self {
            language,
            country,
            variant,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if let Some(country) = &self.country {
            write!(f, "_{}", country)?;
        }
        if let Some(variant) = &self.variant {
            write!(f, "_{}", variant)?;
        }
        Ok(())
    }
}
