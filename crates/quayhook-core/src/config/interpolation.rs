use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpolationError {
    #[error("Required environment variable not found: {0}")]
    MissingVariable(String),

    #[error("Interpolation nested too deeply in: {0}")]
    TooDeep(String),
}

pub type InterpolationResult<T> = Result<T, InterpolationError>;

const MAX_DEPTH: usize = 8;

/// Table whose strings are deployment templates; `${name}` there is a capture
/// placeholder and must reach the expander untouched.
const TEMPLATE_TABLE: &str = "services";

static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("Invalid regex pattern")
});

/// Replaces `${VAR}` and `${VAR:-default}` with values from the environment.
/// Defaults are themselves interpolated; substituted values are not.
pub fn interpolate(input: &str) -> InterpolationResult<String> {
    interpolate_at(input, 0)
}

fn interpolate_at(input: &str, depth: usize) -> InterpolationResult<String> {
    if depth > MAX_DEPTH {
        return Err(InterpolationError::TooDeep(input.to_string()));
    }

    let mut out = String::with_capacity(input.len());
    let mut copied_to = 0;

    for caps in VAR_PATTERN.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let name = &caps[1];

        let value = match (std::env::var(name), caps.get(2)) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => interpolate_at(default.as_str(), depth + 1)?,
            (Err(_), None) => return Err(InterpolationError::MissingVariable(name.to_string())),
        };

        out.push_str(&input[copied_to..whole.start()]);
        out.push_str(&value);
        copied_to = whole.end();
    }

    out.push_str(&input[copied_to..]);
    Ok(out)
}

pub fn interpolate_toml(value: &mut toml::Value) -> InterpolationResult<()> {
    match value {
        toml::Value::String(s) => *s = interpolate(s)?,
        toml::Value::Array(items) => {
            for item in items {
                interpolate_toml(item)?;
            }
        }
        toml::Value::Table(table) => {
            for (_, v) in table.iter_mut() {
                interpolate_toml(v)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Interpolates a whole configuration document except the service templates.
pub fn interpolate_document(document: &mut toml::Value) -> InterpolationResult<()> {
    match document {
        toml::Value::Table(table) => {
            for (key, v) in table.iter_mut() {
                if key != TEMPLATE_TABLE {
                    interpolate_toml(v)?;
                }
            }
            Ok(())
        }
        other => interpolate_toml(other),
    }
}
