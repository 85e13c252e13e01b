use serde::Deserialize;

use crate::errors::AppError;
use crate::models::blog::{NewPost, Visibility};

const MAX_TITLE_LEN: usize = 200;
const MAX_SUMMARY_LEN: usize = 500;
const MAX_SLUG_LEN: usize = 120;
const MAX_TAGS: usize = 20;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub language: Option<String>,
    pub visibility: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Language codes look like `en`, `fr`, `pt-br`: 2–5 chars, lowercase
/// letters and at most one `-`.
pub fn parse_language(raw: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let lang = raw.to_ascii_lowercase();
    let valid = (2..=5).contains(&lang.len())
        && lang.chars().all(|c| c.is_ascii_lowercase() || c == '-')
        && lang.matches('-').count() <= 1
        && !lang.starts_with('-')
        && !lang.ends_with('-');
    if !valid {
        return Err(AppError::Validation(format!(
            "Invalid language code '{raw}'"
        )));
    }
    Ok(Some(lang))
}

/// Visibilities an anonymous caller may list. `private` is admin-only.
pub fn parse_public_visibility(raw: Option<&str>) -> Result<Vec<Visibility>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(vec![Visibility::Public]),
        Some(s) => match Visibility::parse(s) {
            Some(Visibility::Private) => Err(AppError::Forbidden),
            Some(v) => Ok(vec![v]),
            None => Err(AppError::Validation(format!(
                "Invalid visibility '{s}'. Must be 'public' or 'unlisted'"
            ))),
        },
    }
}

/// Admin listing filter: any visibility, or all when absent.
pub fn parse_admin_visibility(raw: Option<&str>) -> Result<Vec<Visibility>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(vec![]),
        Some(s) => Visibility::parse(s)
            .map(|v| vec![v])
            .ok_or_else(|| AppError::Validation(format!("Invalid visibility '{s}'"))),
    }
}

fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_SLUG_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !value.starts_with('-')
        && !value.ends_with('-')
}

/// Derives a slug from a title: lowercase ASCII words joined by `-`.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(MAX_SLUG_LEN)
        .collect::<String>()
        .trim_end_matches('-')
        .to_string()
}

pub fn validate_post(req: CreatePostRequest) -> Result<NewPost, AppError> {
    let title = req
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("title is required".to_string()))?;
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }

    let body = req
        .body
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| AppError::Validation("body is required".to_string()))?;

    let slug = match req.slug.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(slug) => slug,
        None => slugify(&title),
    };
    if !is_slug(&slug) {
        return Err(AppError::Validation(format!("Invalid slug '{slug}'")));
    }

    let summary = req
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if summary
        .as_ref()
        .is_some_and(|s| s.chars().count() > MAX_SUMMARY_LEN)
    {
        return Err(AppError::Validation(format!(
            "summary must be at most {MAX_SUMMARY_LEN} characters"
        )));
    }

    let language = parse_language(req.language.as_deref())?.unwrap_or_else(|| "en".to_string());

    let visibility = match req.visibility.as_deref().map(str::trim) {
        None | Some("") => Visibility::Public,
        Some(v) => Visibility::parse(v)
            .ok_or_else(|| AppError::Validation(format!("Invalid visibility '{v}'")))?,
    };

    let mut tags: Vec<String> = req
        .tags
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    if tags.len() > MAX_TAGS {
        return Err(AppError::Validation(format!(
            "at most {MAX_TAGS} tags are allowed"
        )));
    }

    Ok(NewPost {
        slug,
        title,
        summary,
        body,
        language,
        visibility,
        tags,
    })
}
