//! Environment variable expansion for config values.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// `field` names the config field for error messages. An unset variable
/// without a default is an error; secrets must not silently expand to
/// empty strings.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: "unterminated ${ reference".to_owned(),
            });
        };

        let expr = &after[..end];
        let (name, default) = match expr.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (expr, None),
        };
        if name.is_empty() {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: "empty variable name".to_owned(),
            });
        }

        match std::env::var(name) {
            Ok(env_value) => out.push_str(&env_value),
            Err(_) => match default {
                Some(default) => out.push_str(default),
                None => {
                    return Err(ConfigError::EnvVar {
                        field: field.to_owned(),
                        message: format!("${{{name}}} not set"),
                    });
                }
            },
        }

        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
