//! Ref name validation following git-style conventions.
//!
//! A full ref name is either a top-level pseudo-ref such as `HEAD` or
//! `ORIG_HEAD` (upper-case letters and `_` only), or a path under `refs/`
//! whose components obey these rules:
//!
//! - must not contain whitespace, `~`, `^`, `:`, `?`, `*`, `[`, `\`
//! - must not contain `..` or `@{`
//! - must not start with `.` or end with `.lock`
//! - must be non-empty (no leading, trailing, or doubled `/`)

use crate::error::{RefError, Result};

/// Characters that are forbidden anywhere in a ref name.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

fn invalid(name: &str, reason: impl Into<String>) -> RefError {
    RefError::InvalidRefName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Check the `/`-separated path rules shared by every kind of name.
fn check_path(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "name must not be empty"));
    }

    if let Some(ch) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c) || c.is_control()) {
        return Err(invalid(name, format!("contains forbidden character: {ch:?}")));
    }

    if name.contains("..") {
        return Err(invalid(name, "must not contain '..'"));
    }

    if name.contains("@{") {
        return Err(invalid(name, "must not contain '@{'"));
    }

    if name.ends_with('.') {
        return Err(invalid(name, "must not end with '.'"));
    }

    for component in name.split('/') {
        if component.is_empty() {
            return Err(invalid(name, "path components must not be empty"));
        }
        if component.starts_with('.') {
            return Err(invalid(
                name,
                format!("component must not start with '.': {component:?}"),
            ));
        }
        if component.ends_with(".lock") {
            return Err(invalid(name, "components must not end with '.lock'"));
        }
    }

    Ok(())
}

/// Validate a full ref name such as `HEAD` or `refs/heads/main`.
///
/// # Examples
///
/// ```
/// use cairn_refs::names::validate_ref_name;
///
/// assert!(validate_ref_name("HEAD").is_ok());
/// assert!(validate_ref_name("refs/heads/feature/auth").is_ok());
/// assert!(validate_ref_name("heads/main").is_err());
/// assert!(validate_ref_name("refs/heads/../config").is_err());
/// ```
pub fn validate_ref_name(name: &str) -> Result<()> {
    check_path(name)?;

    if !name.contains('/') {
        if name.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
            return Ok(());
        }
        return Err(invalid(name, "top-level refs must be upper-case (e.g. HEAD)"));
    }

    if !name.starts_with("refs/") {
        return Err(invalid(name, "must be HEAD-like or live under 'refs/'"));
    }
    Ok(())
}

/// Validate a short tag name (the part after `refs/tags/`).
///
/// ```
/// use cairn_refs::validate_tag_name;
///
/// assert!(validate_tag_name("v1.0").is_ok());
/// assert!(validate_tag_name("bad..name").is_err());
/// ```
pub fn validate_tag_name(name: &str) -> Result<()> {
    check_path(name).map_err(|err| match err {
        RefError::InvalidRefName { reason, .. } => {
            invalid(name, format!("invalid tag name: {reason}"))
        }
        other => other,
    })
}
