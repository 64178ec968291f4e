//! Post payload validation and normalisation.

use std::collections::HashSet;

use crate::domain::{
    error::DomainError,
    url_safe::{MAX_NAME_LEN, is_url_safe, to_url_safe},
};

pub const MAX_TAGS: usize = 10;
pub const MAX_CATEGORIES: usize = 10;

/// Raw author input for a save or submit.
#[derive(Debug, Clone, Default)]
pub struct PostPayload {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

/// A payload that passed validation. Taxonomy names are reduced to their
/// URL-safe form and de-duplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPost {
    pub title: String,
    pub url_title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

impl PostPayload {
    pub fn validate(self) -> Result<ValidatedPost, DomainError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("title", "must not be empty"));
        }
        if !is_url_safe(title) {
            return Err(DomainError::validation(
                "title",
                format!(
                    "`{title}` must use letters, digits, `-`, `_` or spaces (max {MAX_NAME_LEN})"
                ),
            ));
        }

        if self.body.trim().is_empty() {
            return Err(DomainError::validation("body", "must not be empty"));
        }

        let tags = normalise_names("tags", &self.tags, 1, MAX_TAGS)?;
        let categories = normalise_names("categories", &self.categories, 1, MAX_CATEGORIES)?;

        Ok(ValidatedPost {
            url_title: to_url_safe(title),
            title: title.to_string(),
            body: self.body,
            tags,
            categories,
        })
    }
}

fn normalise_names(
    field: &'static str,
    names: &[String],
    min: usize,
    max: usize,
) -> Result<Vec<String>, DomainError> {
    if names.len() < min || names.len() > max {
        return Err(DomainError::validation(
            field,
            format!("expected between {min} and {max} entries, got {}", names.len()),
        ));
    }

    let mut seen = HashSet::with_capacity(names.len());
    let mut kept = Vec::with_capacity(names.len());
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation(field, "entries must not be empty"));
        }
        if !is_url_safe(trimmed) {
            return Err(DomainError::validation(
                field,
                format!("`{trimmed}` must use letters, digits, `-`, `_` or spaces"),
            ));
        }
        let name = to_url_safe(trimmed);
        if seen.insert(name.clone()) {
            kept.push(name);
        }
    }

    Ok(kept)
}
