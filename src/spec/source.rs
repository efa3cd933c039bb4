//! Reading spec documents from disk or over HTTP, as JSON or YAML.

use std::fmt;
use std::path::PathBuf;

use serde_json::{Map, Number, Value};

use super::error::SpecError;

/// Where a spec document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    File(PathBuf),
    Url(String),
}

impl SpecSource {
    /// Anything starting with `http://` or `https://` is fetched; everything
    /// else is treated as a local path.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if is_url(trimmed) {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for SpecSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecSource::File(path) => write!(f, "{}", path.display()),
            SpecSource::Url(url) => write!(f, "{url}"),
        }
    }
}

pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Read the raw document text.
pub async fn read_source(source: &SpecSource, client: &reqwest::Client) -> Result<String, SpecError> {
    match source {
        SpecSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SpecError::Read {
                    path: path.clone(),
                    source,
                })
        }
        SpecSource::Url(url) => {
            tracing::debug!("fetching spec from {url}");
            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(SpecError::Fetch {
                    url: url.clone(),
                    message: format!("unexpected status {status}"),
                });
            }
            Ok(response.text().await?)
        }
    }
}

/// Parse document text as JSON, falling back to YAML. YAML merge keys
/// (`<<: *anchor`) are resolved before conversion.
pub fn parse_document(text: &str) -> Result<Value, SpecError> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(json_error) => match serde_yaml::from_str::<serde_yaml::Value>(text) {
            Ok(mut yaml) => {
                yaml.apply_merge()
                    .map_err(|e| SpecError::Parse(format!("invalid YAML merge key: {e}")))?;
                Ok(yaml_to_json(yaml))
            }
            Err(yaml_error) => Err(SpecError::Parse(format!(
                "not JSON ({json_error}) and not YAML ({yaml_error})"
            ))),
        },
    }
}

/// Convert a YAML tree into JSON. Non-string mapping keys (numeric response
/// codes, booleans) are rendered as their scalar text.
pub fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(flag) => Value::Bool(flag),
        Yaml::Number(number) => yaml_number(&number),
        Yaml::String(text) => Value::String(text),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                object.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(number: &serde_yaml::Number) -> Value {
    if let Some(unsigned) = number.as_u64() {
        Value::Number(unsigned.into())
    } else if let Some(signed) = number.as_i64() {
        Value::Number(signed.into())
    } else {
        number
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(text) => text,
        Yaml::Number(number) => number.to_string(),
        Yaml::Bool(flag) => flag.to_string(),
        Yaml::Null => "null".to_string(),
        Yaml::Tagged(tagged) => yaml_key(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|text| text.trim().to_string())
            .unwrap_or_default(),
    }
}
