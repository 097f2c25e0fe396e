//! Sources of secret material (private keys, API keys) referenced by name
//! from the configuration file

use std::{collections::HashMap, env};

/// A source from which named secrets are resolved.
///
/// Empty values are treated the same as missing ones.
pub trait SecretSource {
    /// Look up the secret with the given name
    fn secret(&self, name: &str) -> Option<String>;
}

/// Resolves secrets from the process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecrets;

impl SecretSource for EnvSecrets {
    fn secret(&self, name: &str) -> Option<String> {
        env::var(name).ok().filter(|v| !v.is_empty())
    }
}

impl SecretSource for HashMap<String, String> {
    fn secret(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

/// Substitute every `${NAME}` placeholder in `template` with the named secret.
///
/// Returns the names of the placeholders that could not be resolved as the error.
pub fn interpolate(template: &str, secrets: &impl SecretSource) -> Result<String, Vec<String>> {
    let mut out = String::with_capacity(template.len());
    let mut missing = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated placeholder, keep it verbatim
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };

        let name = &after[..end];
        match secrets.secret(name) {
            Some(value) => out.push_str(&value),
            None => missing.push(name.to_string()),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    if missing.is_empty() {
        Ok(out)
    } else {
        Err(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secrets(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_secret_is_absent() {
        let s = secrets(&[("KEY", "")]);
        assert_eq!(s.secret("KEY"), None);
        assert_eq!(s.secret("OTHER"), None);
    }

    #[test]
    fn test_interpolate_replaces_placeholders() {
        let s = secrets(&[("INFURA_API_KEY", "abc123")]);
        let url = interpolate("https://rinkeby.infura.io/v3/${INFURA_API_KEY}", &s).unwrap();
        assert_eq!(url, "https://rinkeby.infura.io/v3/abc123");
    }

    #[test]
    fn test_interpolate_reports_all_missing() {
        let s = secrets(&[("A", "1")]);
        let missing = interpolate("${A}/${B}/${C}", &s).unwrap_err();
        assert_eq!(missing, vec!["B".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_interpolate_without_placeholders() {
        let s = secrets(&[]);
        assert_eq!(
            interpolate("http://127.0.0.1:7545", &s).unwrap(),
            "http://127.0.0.1:7545"
        );
    }
}
