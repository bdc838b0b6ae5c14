use std::fmt::{Display, Formatter};

use moonlight_core::{AppError, AppResult};
use serde::Serialize;

/// URL-safe article identifier: lowercase ASCII alphanumerics separated by single hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Slug(String);

impl Slug {
    /// Derives a slug from an article title.
    pub fn from_title(title: &str) -> AppResult<Self> {
        let slug = slugify(title);
        if slug.is_empty() {
            return Err(AppError::Validation(format!(
                "title '{title}' must contain at least one ASCII letter or digit to derive a slug"
            )));
        }

        Ok(Self(slug))
    }

    /// Parses an explicitly supplied slug without rewriting it.
    pub fn parse(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if !is_url_safe(value.as_str()) {
            return Err(AppError::Validation(format!(
                "slug '{value}' must be lowercase letters, digits and single hyphens"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the slug string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Slug {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

/// Converts a title into its slug form.
///
/// Letters are lowercased, characters other than ASCII alphanumerics, whitespace
/// and hyphens are dropped, and every run of whitespace or hyphens between words
/// becomes a single hyphen. Separators at either end are discarded, so the result
/// may be empty for titles without any ASCII alphanumerics.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for character in title.chars() {
        if character.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(character.to_ascii_lowercase());
        } else if character.is_whitespace() || character == '-' {
            pending_separator = true;
        }
    }

    slug
}

fn is_url_safe(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--")
        && value.chars().all(|character| {
            character.is_ascii_lowercase() || character.is_ascii_digit() || character == '-'
        })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{Slug, is_url_safe, slugify};

    #[test]
    fn slugify_keeps_hyphenated_words_and_drops_punctuation() {
        assert_eq!(
            slugify("The Future of AI-Powered Content Creation"),
            "the-future-of-ai-powered-content-creation"
        );
        assert_eq!(
            slugify("Google's Nano Banana: 2025 Edition!"),
            "googles-nano-banana-2025-edition"
        );
    }

    #[test]
    fn slugify_collapses_separator_runs() {
        assert_eq!(slugify("  Rust  --  in\tProduction \n"), "rust-in-production");
        assert_eq!(slugify("a - b"), "a-b");
    }

    #[test]
    fn slugify_drops_non_ascii_letters() {
        assert_eq!(slugify("Café Über Trends"), "caf-ber-trends");
    }

    #[test]
    fn punctuation_only_title_has_no_slug() {
        assert_eq!(slugify("!!! ???"), "");
        assert!(Slug::from_title("!!! ???").is_err());
    }

    #[test]
    fn explicit_slug_must_already_be_url_safe() {
        assert!(Slug::parse("launch-notes-2025").is_ok());
        assert!(Slug::parse("Launch-Notes").is_err());
        assert!(Slug::parse("launch--notes").is_err());
        assert!(Slug::parse("-launch").is_err());
        assert!(Slug::parse("launch notes").is_err());
        assert!(Slug::parse("").is_err());
    }

    proptest! {
        #[test]
        fn slugify_output_is_always_url_safe(title in any::<String>()) {
            let slug = slugify(title.as_str());
            prop_assert!(slug.is_empty() || is_url_safe(slug.as_str()));
            prop_assert_eq!(slug.clone(), slug.to_lowercase());
        }

        #[test]
        fn slugify_is_idempotent(title in "[A-Za-z0-9 _!?'-]{0,64}") {
            let once = slugify(title.as_str());
            prop_assert_eq!(slugify(once.as_str()), once);
        }
    }
}
