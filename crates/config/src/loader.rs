//! Loaders merging external sources into a configuration

use crate::binder::Configuration;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde_json::Value as JsonValue;
use std::path::Path;
use tracing::{debug, warn};
use types::{BindError, RawValue, Result, Value};

/// The process environment as a property set.
///
/// Variables whose name or value is not valid unicode are skipped.
pub fn environment() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

/// Loads figment providers into a configuration with mapping semantics
pub struct SourceLoader;

impl SourceLoader {
    /// Merge a YAML file
    pub fn yaml_file<P: AsRef<Path>>(config: &mut Configuration, path: P) -> Result<()> {
        let path = path.as_ref();

        // Figment treats a missing file as empty
        if !path.exists() {
            return Err(BindError::Source {
                source_name: path.display().to_string(),
                message: "Configuration file not found".to_string(),
            });
        }

        Self::merge(
            config,
            &Figment::new().merge(Yaml::file(path)),
            &path.display().to_string(),
        )
    }

    /// Merge YAML from a string
    pub fn yaml_str(config: &mut Configuration, yaml_content: &str) -> Result<()> {
        Self::merge(config, &Figment::new().merge(Yaml::string(yaml_content)), "yaml")
    }

    /// Merge environment variables starting with `prefix`.
    ///
    /// The prefix is stripped and the remaining name lowercased.
    pub fn env_prefixed(config: &mut Configuration, prefix: &str) -> Result<()> {
        Self::merge(config, &Figment::new().merge(Env::prefixed(prefix)), prefix)
    }

    /// Merge an arbitrary figment
    pub fn figment(config: &mut Configuration, figment: &Figment) -> Result<()> {
        Self::merge(config, figment, "figment")
    }

    fn merge(config: &mut Configuration, figment: &Figment, source_name: &str) -> Result<()> {
        let tree: JsonValue = figment.extract().map_err(|e| BindError::Source {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

        let mut entries = Vec::new();
        flatten(None, tree, &mut entries);
        debug!(source = source_name, count = entries.len(), "Merging configuration source");

        config.add_mapping(entries);
        Ok(())
    }
}

/// Flatten nested tables into dot-joined keys
fn flatten(prefix: Option<&str>, value: JsonValue, out: &mut Vec<(String, RawValue)>) {
    match value {
        JsonValue::Object(table) => {
            for (name, child) in table {
                let key = match prefix {
                    Some(prefix) => format!("{}.{}", prefix, name),
                    None => name,
                };
                flatten(Some(key.as_str()), child, out);
            }
        }
        other => {
            let Some(key) = prefix else {
                return;
            };
            if let Some(raw) = raw_value(key, other) {
                out.push((key.to_string(), raw));
            }
        }
    }
}

fn raw_value(key: &str, value: JsonValue) -> Option<RawValue> {
    match value {
        JsonValue::Null | JsonValue::Object(_) => None,
        JsonValue::Bool(flag) => Some(RawValue::Flag(flag)),
        JsonValue::Number(number) => number
            .as_i64()
            .map(Value::Long)
            .or_else(|| number.as_f64().map(Value::Double))
            .map(RawValue::Typed),
        JsonValue::String(text) => Some(RawValue::Text(text)),
        JsonValue::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                match scalar_text(item) {
                    Some(text) => values.push(text),
                    None => warn!(key, "Skipping non-scalar array element"),
                }
            }
            Some(RawValue::List(values))
        }
    }
}

fn scalar_text(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::String(text) => Some(text),
        JsonValue::Bool(flag) => Some(flag.to_string()),
        JsonValue::Number(number) => Some(number.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_flattened_into_dotted_keys() {
        let yaml_content = r#"
server:
  host: "0.0.0.0"
  port: 8080
  ratio: 0.5
  cors: true
hosts: [a, b, 3]
"#;
        let mut config = Configuration::new();
        SourceLoader::yaml_str(&mut config, yaml_content).unwrap();

        let entries = config.entries();
        assert_eq!(entries.get("server.host"), Some(&RawValue::Text("0.0.0.0".to_string())));
        assert_eq!(entries.get("server.port"), Some(&RawValue::Typed(Value::Long(8080))));
        assert_eq!(entries.get("server.ratio"), Some(&RawValue::Typed(Value::Double(0.5))));
        assert_eq!(entries.get("server.cors"), Some(&RawValue::Flag(true)));
        assert_eq!(
            entries.get("hosts"),
            Some(&RawValue::List(vec!["a".to_string(), "b".to_string(), "3".to_string()]))
        );
    }

    #[test]
    fn test_yaml_overwrites_existing_entries() {
        let mut config = Configuration::new();
        config.add_tokens(["--level=1", "--level=2"]).unwrap();
        SourceLoader::yaml_str(&mut config, "level: debug").unwrap();

        assert_eq!(
            config.entries().get("level"),
            Some(&RawValue::Text("debug".to_string()))
        );
    }

    #[test]
    fn test_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name: from-file").unwrap();

        let mut config = Configuration::new();
        SourceLoader::yaml_file(&mut config, file.path()).unwrap();
        assert_eq!(
            config.entries().get("name"),
            Some(&RawValue::Text("from-file".to_string()))
        );
    }

    #[test]
    fn test_missing_yaml_file() {
        let mut config = Configuration::new();
        let result = SourceLoader::yaml_file(&mut config, "/nonexistent/cfgbind.yaml");
        assert!(matches!(result, Err(BindError::Source { .. })));
    }

    #[test]
    fn test_invalid_yaml() {
        let mut config = Configuration::new();
        let result = SourceLoader::yaml_str(&mut config, "key: [unclosed");
        assert!(matches!(result, Err(BindError::Source { .. })));
        assert!(config.entries().is_empty());
    }

    #[test]
    fn test_environment_properties() {
        std::env::set_var("CFGBIND_LOADER_TEST", "present");
        let mut config = Configuration::new();
        config.add_properties(environment());

        assert_eq!(
            config.entries().get("CFGBIND_LOADER_TEST"),
            Some(&RawValue::Text("present".to_string()))
        );
    }

    #[test]
    fn test_env_prefixed() {
        std::env::set_var("CFGBIND_PREFIXED_PORT", "9000");
        let mut config = Configuration::new();
        SourceLoader::env_prefixed(&mut config, "CFGBIND_PREFIXED_").unwrap();

        assert!(config.entries().contains("port"));
    }
}
