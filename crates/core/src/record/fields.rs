use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::kind::ContentKind;
use super::validate::ValidationError;

/// Field names that belong to the record envelope and may never be written.
const IMMUTABLE_FIELDS: [&str; 3] = ["id", "createdAt", "kind"];

/// Decoded submission fields, always as text, keyed by wire name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: BTreeMap<String, String>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a JSON object into text fields. `null` counts as absent;
    /// nested objects and arrays are rejected.
    pub fn from_json(object: Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = FieldSet::new();
        for (name, value) in object {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ValidationError::InvalidFieldType { field: name })
                }
            };
            fields.insert(name, text);
        }
        Ok(fields)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Copy of `self` with every field in `patch` written over it.
    pub fn overlay(&self, patch: &FieldSet) -> FieldSet {
        let mut merged = self.clone();
        for (name, value) in &patch.values {
            merged.values.insert(name.clone(), value.clone());
        }
        merged
    }

    /// Reject envelope fields, text `image` values and names the kind does not define.
    pub fn check_names(
        &self,
        kind: ContentKind,
        accepted: &[&str],
    ) -> Result<(), ValidationError> {
        for name in self.names() {
            if IMMUTABLE_FIELDS.contains(&name) {
                return Err(ValidationError::ImmutableField {
                    field: name.to_string(),
                });
            }
            if name == "image" {
                return Err(ValidationError::ImageAsText);
            }
            if !accepted.contains(&name) {
                return Err(ValidationError::UnknownField {
                    kind,
                    field: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = FieldSet::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_scalars_become_text() {
        let Value::Object(obj) = json!({
            "name": "Jane Doe",
            "rating": 5,
            "featured": true,
            "content": null,
        }) else {
            unreachable!()
        };
        let fields = FieldSet::from_json(obj).unwrap();
        assert_eq!(fields.get("name"), Some("Jane Doe"));
        assert_eq!(fields.get("rating"), Some("5"));
        assert_eq!(fields.get("featured"), Some("true"));
        assert_eq!(fields.get("content"), None);
    }

    #[test]
    fn nested_values_are_rejected() {
        let Value::Object(obj) = json!({ "title": ["a", "b"] }) else {
            unreachable!()
        };
        assert_eq!(
            FieldSet::from_json(obj),
            Err(ValidationError::InvalidFieldType {
                field: "title".into()
            })
        );
    }

    #[test]
    fn overlay_prefers_patch_values() {
        let base: FieldSet = [("title", "Old"), ("description", "Keep")]
            .into_iter()
            .collect();
        let patch: FieldSet = [("title", "New")].into_iter().collect();
        let merged = base.overlay(&patch);
        assert_eq!(merged.get("title"), Some("New"));
        assert_eq!(merged.get("description"), Some("Keep"));
    }

    #[test]
    fn check_names_flags_envelope_and_unknown_fields() {
        let accepted = ["title"];
        let fields: FieldSet = [("createdAt", "2024-01-01")].into_iter().collect();
        assert!(matches!(
            fields.check_names(ContentKind::Video, &accepted),
            Err(ValidationError::ImmutableField { .. })
        ));

        let fields: FieldSet = [("image", "/etc/passwd")].into_iter().collect();
        assert_eq!(
            fields.check_names(ContentKind::Service, &accepted),
            Err(ValidationError::ImageAsText)
        );

        let fields: FieldSet = [("colour", "red")].into_iter().collect();
        assert!(matches!(
            fields.check_names(ContentKind::Video, &accepted),
            Err(ValidationError::UnknownField { ref field, .. }) if field == "colour"
        ));

        let fields: FieldSet = [("title", "ok")].into_iter().collect();
        assert!(fields.check_names(ContentKind::Video, &accepted).is_ok());
    }
}
