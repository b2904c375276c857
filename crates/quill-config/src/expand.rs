//! Environment variable expansion in configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a configuration
/// value.
///
/// `${VAR}` errors when the variable is unset; `${VAR:-default}` falls back
/// to the default. Text outside references is copied through unchanged.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: "unterminated ${ reference".to_owned(),
            });
        };
        let reference = &after[..end];
        let (name, default) = match reference.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (reference, None),
        };
        if name.is_empty() {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: "empty variable name".to_owned(),
            });
        }
        match std::env::var(name) {
            Ok(value) => result.push_str(&value),
            Err(_) => match default {
                Some(default) => result.push_str(default),
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

    result.push_str(rest);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_literal_passes_through() {
        assert_eq!(expand_env("127.0.0.1", "server.host").unwrap(), "127.0.0.1");
    }

    #[test]
    fn test_expands_set_variable() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUILL_EXPAND_TEST", "0.0.0.0");
        }
        assert_eq!(
            expand_env("${QUILL_EXPAND_TEST}", "server.host").unwrap(),
            "0.0.0.0"
        );
        unsafe {
            std::env::remove_var("QUILL_EXPAND_TEST");
        }
    }

    #[test]
    fn test_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUILL_EXPAND_MISSING");
        }
        assert_eq!(
            expand_env("${QUILL_EXPAND_MISSING:-fallback}", "database.path").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_missing_required_variable_errors() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUILL_EXPAND_REQUIRED");
        }
        let err = expand_env("${QUILL_EXPAND_REQUIRED}", "database.path").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("QUILL_EXPAND_REQUIRED"));
        assert!(err.to_string().contains("database.path"));
    }

    #[test]
    fn test_reference_embedded_in_text() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUILL_EXPAND_DIR", "/var/data");
        }
        assert_eq!(
            expand_env("${QUILL_EXPAND_DIR}/quill.db", "database.path").unwrap(),
            "/var/data/quill.db"
        );
        unsafe {
            std::env::remove_var("QUILL_EXPAND_DIR");
        }
    }

    #[test]
    fn test_unterminated_reference_errors() {
        let err = expand_env("${OOPS", "server.host").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
    }
}
