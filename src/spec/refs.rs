//! Structural expansion of local `$ref` pointers.
//!
//! Every `{"$ref": "#/..."}` object is replaced by a copy of its target, which
//! is itself expanded. A reference that is already being expanded higher up
//! the stack is a cycle; it is cut and replaced by an empty schema, so the
//! resulting tree is always finite.

use serde_json::{Map, Value};

const REF_KEY: &str = "$ref";

/// Expand all local references in `document`. Unresolvable and non-local
/// references are reported together.
pub fn expand_local_refs(document: &Value) -> Result<Value, Vec<String>> {
    let mut expander = Expander {
        root: document,
        stack: Vec::new(),
        errors: Vec::new(),
    };
    let expanded = expander.expand(document, "#");
    if expander.errors.is_empty() {
        Ok(expanded)
    } else {
        Err(expander.errors)
    }
}

struct Expander<'a> {
    root: &'a Value,
    stack: Vec<String>,
    errors: Vec<String>,
}

impl Expander<'_> {
    fn expand(&mut self, value: &Value, location: &str) -> Value {
        match value {
            Value::Object(object) => match object.get(REF_KEY).and_then(Value::as_str) {
                Some(reference) => self.follow(reference, location),
                None => {
                    let mut expanded = Map::with_capacity(object.len());
                    for (key, child) in object {
                        let child_location = format!("{location}/{key}");
                        expanded.insert(key.clone(), self.expand(child, &child_location));
                    }
                    Value::Object(expanded)
                }
            },
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| self.expand(item, &format!("{location}/{index}")))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn follow(&mut self, reference: &str, location: &str) -> Value {
        let Some(fragment) = reference.strip_prefix('#') else {
            self.errors.push(format!(
                "{location}: unsupported external reference '{reference}'"
            ));
            return Value::Object(Map::new());
        };

        if self.stack.iter().any(|active| active == reference) {
            tracing::debug!("cutting cyclic reference {reference} at {location}");
            return Value::Object(Map::new());
        }

        let pointer = urlencoding::decode(fragment)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| fragment.to_string());
        let Some(target) = self.root.pointer(&pointer) else {
            self.errors
                .push(format!("{location}: unresolved reference '{reference}'"));
            return Value::Object(Map::new());
        };

        self.stack.push(reference.to_string());
        let expanded = self.expand(target, reference);
        self.stack.pop();
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn expands_nested_component_references() {
        let doc = json!({
            "components": { "schemas": {
                "Tag": { "type": "string", "maxLength": 8 },
                "Pet": { "type": "object", "properties": {
                    "tags": { "type": "array", "items": { "$ref": "#/components/schemas/Tag" } }
                }}
            }},
            "body": { "$ref": "#/components/schemas/Pet" }
        });

        let expanded = expand_local_refs(&doc).unwrap();
        assert_eq!(
            expanded["body"]["properties"]["tags"]["items"],
            json!({ "type": "string", "maxLength": 8 })
        );
    }

    #[test]
    fn cyclic_reference_is_cut_to_empty_schema() {
        let doc = json!({
            "definitions": { "Node": { "type": "object", "properties": {
                "next": { "$ref": "#/definitions/Node" }
            }}},
            "root": { "$ref": "#/definitions/Node" }
        });

        let expanded = expand_local_refs(&doc).unwrap();
        assert_eq!(expanded["root"]["type"], "object");
        assert_eq!(expanded["root"]["properties"]["next"], json!({}));
        // Expanding the definition in place unrolls one level before the cut.
        assert_eq!(
            expanded["definitions"]["Node"]["properties"]["next"]["properties"]["next"],
            json!({})
        );
    }

    #[test]
    fn escaped_pointer_segments_resolve() {
        let doc = json!({
            "paths": { "/pets": { "parameters": [ { "name": "limit", "in": "query" } ] } },
            "alias": { "$ref": "#/paths/~1pets/parameters/0" }
        });

        let expanded = expand_local_refs(&doc).unwrap();
        assert_eq!(expanded["alias"]["name"], "limit");
    }

    #[test]
    fn unresolved_and_external_references_are_collected() {
        let doc = json!({
            "a": { "$ref": "#/definitions/Missing" },
            "b": { "$ref": "other.yaml#/Pet" }
        });

        let errors = expand_local_refs(&doc).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("unresolved reference"));
        assert!(errors[1].contains("unsupported external reference"));
    }
}
