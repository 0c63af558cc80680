//! Naming policies for generated paths and identifiers.
//!
//! Two cleaning rules exist on purpose: hyphens are valid inside directory
//! names but not inside Go identifiers, so paths are cleaned with
//! [`clean_path_segment`] and package names or constants with
//! [`clean_identifier`].

use std::sync::OnceLock;

use cruet::Inflector;
use regex::Regex;

use crate::error::{Error, Result};

const PATH_UNSAFE: [char; 4] = ['*', ' ', '/', ':'];

static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn name_pattern() -> Result<&'static Regex> {
    if let Some(pattern) = NAME_PATTERN.get() {
        return Ok(pattern);
    }
    let pattern = Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$")
        .map_err(|e| Error::ValidationError(e.to_string()))?;
    Ok(NAME_PATTERN.get_or_init(|| pattern))
}

/// Strips path-unsafe characters, keeping hyphens.
pub fn clean_path_segment(value: &str) -> String {
    value.chars().filter(|c| !PATH_UNSAFE.contains(c)).collect()
}

/// Strips path-unsafe characters and hyphens.
pub fn clean_identifier(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '-' && !PATH_UNSAFE.contains(c))
        .collect()
}

pub fn to_pascal(value: &str) -> String {
    value.to_pascal_case()
}

pub fn to_snake(value: &str) -> String {
    value.to_snake_case()
}

/// Checks that a service, module or use-case name can be turned into a path.
///
/// # Arguments
/// * `kind` - What the name is for, used in the error message
/// * `value` - Name to check
///
/// # Returns
/// * `Result<()>` - Ok if the name is usable
///
/// # Errors
/// * `Error::ValidationError` if the name is empty or contains characters
///   other than letters, digits, `_` and `-`, or does not start with a letter
pub fn validate_name(kind: &str, value: &str) -> Result<()> {
    if name_pattern()?.is_match(value) {
        Ok(())
    } else {
        Err(Error::ValidationError(format!(
            "invalid {kind} name '{value}': use letters, digits, '_' or '-' and start with a letter"
        )))
    }
}
