use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpolationError {
    #[error("Required environment variable not found: {0}")]
    RequiredVarNotFound(String),

    #[error("Interpolation did not settle after {0} passes")]
    RecursionLimit(usize),
}

pub type InterpolationResult<T> = Result<T, InterpolationError>;

const MAX_PASSES: usize = 10;

static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("valid variable pattern")
});

/// Expands `${VAR}` and `${VAR:-default}`. Values and defaults that contain
/// further references are expanded again, up to a fixed number of passes.
pub fn interpolate(input: &str) -> InterpolationResult<String> {
    let mut current = input.to_string();

    for _ in 0..MAX_PASSES {
        if !has_variables(&current) {
            return Ok(current);
        }
        current = expand_once(&current)?;
    }

    if has_variables(&current) {
        return Err(InterpolationError::RecursionLimit(MAX_PASSES));
    }
    Ok(current)
}

fn expand_once(input: &str) -> InterpolationResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for cap in VAR_PATTERN.captures_iter(input) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        out.push_str(&input[last..whole.start()]);

        match (std::env::var(name.as_str()), cap.get(2)) {
            (Ok(value), _) => out.push_str(&value),
            (Err(_), Some(default)) => out.push_str(default.as_str()),
            (Err(_), None) => {
                return Err(InterpolationError::RequiredVarNotFound(
                    name.as_str().to_string(),
                ));
            }
        }
        last = whole.end();
    }

    out.push_str(&input[last..]);
    Ok(out)
}

/// Interpolates every string in a parsed TOML document, keys excluded
pub fn interpolate_toml(value: &mut toml::Value) -> InterpolationResult<()> {
    match value {
        toml::Value::String(s) => *s = interpolate(s)?,
        toml::Value::Array(items) => items.iter_mut().try_for_each(interpolate_toml)?,
        toml::Value::Table(table) => table
            .iter_mut()
            .try_for_each(|(_, v)| interpolate_toml(v))?,
        _ => {}
    }
    Ok(())
}

pub fn has_variables(input: &str) -> bool {
    VAR_PATTERN.is_match(input)
}
