use std::{collections::HashMap, sync::LazyLock};

use regex::{Captures, Regex};

// Names are limited to what a shell accepts (`[:word:]`), plus `.` which shows up in names
// exported from Java properties files.
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \$\$|
        \$([[:word:].]+)|
        \$\{([[:word:].]+)(?:(:?-|:?\?)([^}]*))?\}",
    )
    .expect("variable pattern is valid")
});

/// Substitutes `$VAR`, `${VAR}`, `${VAR:-default}`, `${VAR-default}`, `${VAR:?error}` and
/// `${VAR?error}` in `input`. `$$` escapes a literal `$`.
///
/// Unknown plain variables become empty strings and are logged. Every failed `?` form is
/// collected into the error.
pub fn interpolate(input: &str, vars: &HashMap<String, String>) -> Result<String, Vec<String>> {
    let mut errors = Vec::new();

    let interpolated = VARIABLE
        .replace_all(input, |caps: &Captures<'_>| {
            let Some(name) = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()) else {
                return "$".to_owned();
            };
            let flag = caps.get(3).map_or("", |m| m.as_str());
            let fallback = caps.get(4).map_or("", |m| m.as_str());
            let value = vars.get(name).map(String::as_str);
            let non_empty = value.filter(|v| !v.is_empty());

            let substituted = match (flag, value) {
                (":-", _) => non_empty.unwrap_or(fallback),
                ("-", _) => value.unwrap_or(fallback),
                (":?", _) => non_empty.unwrap_or_else(|| {
                    errors.push(format!(
                        "Non-empty environment variable required in config. name = {name:?}, error = {fallback:?}"
                    ));
                    ""
                }),
                ("?", _) => value.unwrap_or_else(|| {
                    errors.push(format!(
                        "Missing environment variable required in config. name = {name:?}, error = {fallback:?}"
                    ));
                    ""
                }),
                (_, Some(value)) => value,
                (_, None) => {
                    warn!(message = "Unknown environment variable in config.", variable = name);
                    ""
                }
            };
            substituted.to_owned()
        })
        .into_owned();

    if errors.is_empty() {
        Ok(interpolated)
    } else {
        Err(errors)
    }
}
