// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema validation for inbound blog post payloads.
//!
//! Automation clients send camelCase field names; older clients send
//! snake_case. Both are accepted and collapse into one canonical
//! [`BlogPostPayload`]. When both spellings are present the camelCase
//! value wins. Every error is collected before returning.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Category of a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Missing, null, or of the wrong JSON type.
    InvalidType,
    /// Present but empty.
    TooSmall,
}

/// One validation failure, addressed by a dot-joined field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Path such as `title` or `keywords.2`. Empty for the root.
    pub field: String,
    #[serde(skip)]
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    fn invalid_type(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::InvalidType,
            message: message.into(),
        }
    }

    fn too_small(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::TooSmall,
            message: message.into(),
        }
    }
}

/// A validated blog post payload in canonical form.
///
/// Serializes with camelCase names; this is the form recorded in the
/// automation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostPayload {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
}

/// JSON type name as reported in "Expected ..., received ..." messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn required_string(
    obj: &Map<String, Value>,
    key: &str,
    empty_message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => {
            errors.push(FieldError::invalid_type(key, "Required"));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.push(FieldError::too_small(key, empty_message));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.push(FieldError::invalid_type(
                key,
                format!("Expected string, received {}", type_name(other)),
            ));
            None
        }
    }
}

/// First non-empty string among `keys`, in order. Null and empty count as absent.
fn optional_string(
    obj: &Map<String, Value>,
    keys: &[&str],
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let mut found = None;
    for key in keys {
        match obj.get(*key) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) if s.is_empty() => {}
            Some(Value::String(s)) => {
                if found.is_none() {
                    found = Some(s.clone());
                }
            }
            Some(other) => errors.push(FieldError::invalid_type(
                *key,
                format!("Expected string, received {}", type_name(other)),
            )),
        }
    }
    found
}

/// First string array among `keys`. Element errors are reported as `key.index`.
fn optional_string_array(
    obj: &Map<String, Value>,
    keys: &[&str],
    errors: &mut Vec<FieldError>,
) -> Option<Vec<String>> {
    let mut found = None;
    for key in keys {
        match obj.get(*key) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                let mut values = Vec::with_capacity(items.len());
                let mut valid = true;
                for (idx, item) in items.iter().enumerate() {
                    match item {
                        Value::String(s) => values.push(s.clone()),
                        other => {
                            valid = false;
                            errors.push(FieldError::invalid_type(
                                format!("{key}.{idx}"),
                                format!("Expected string, received {}", type_name(other)),
                            ));
                        }
                    }
                }
                if valid && found.is_none() {
                    found = Some(values);
                }
            }
            Some(other) => errors.push(FieldError::invalid_type(
                *key,
                format!("Expected array, received {}", type_name(other)),
            )),
        }
    }
    found
}

fn optional_bool(obj: &Map<String, Value>, key: &str, errors: &mut Vec<FieldError>) -> Option<bool> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(other) => {
            errors.push(FieldError::invalid_type(
                key,
                format!("Expected boolean, received {}", type_name(other)),
            ));
            None
        }
    }
}

/// Validate a raw webhook body and normalize it to a [`BlogPostPayload`].
///
/// Unknown fields are ignored.
pub fn validate_payload(raw: &Value) -> Result<BlogPostPayload, Vec<FieldError>> {
    let Value::Object(obj) = raw else {
        return Err(vec![FieldError::invalid_type(
            "",
            format!("Expected object, received {}", type_name(raw)),
        )]);
    };

    let mut errors = Vec::new();
    let title = required_string(obj, "title", "Title is required", &mut errors);
    let content = required_string(obj, "content", "Content is required", &mut errors);

    let slug = optional_string(obj, &["slug"], &mut errors);
    let excerpt = optional_string(obj, &["excerpt"], &mut errors);
    let image_url = optional_string(obj, &["imageUrl", "featured_image"], &mut errors);
    let meta_description =
        optional_string(obj, &["metaDescription", "meta_description"], &mut errors);
    let keywords = optional_string_array(obj, &["keywords", "meta_keywords"], &mut errors);
    let author = optional_string(obj, &["author"], &mut errors);
    let publish = optional_bool(obj, "publish", &mut errors);
    let execution_id = optional_string(obj, &["executionId", "n8n_execution_id"], &mut errors);

    match (title, content) {
        (Some(title), Some(content)) if errors.is_empty() => Ok(BlogPostPayload {
            title,
            content,
            slug,
            excerpt,
            image_url,
            meta_description,
            keywords,
            author,
            publish,
            execution_id,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_errors(raw: Value) -> Vec<FieldError> {
        validate_payload(&raw).expect_err("payload should be rejected")
    }

    #[test]
    fn minimal_payload_validates() {
        let payload = validate_payload(&json!({
            "title": "Test Post",
            "content": "This is test content"
        }))
        .unwrap();
        assert_eq!(payload.title, "Test Post");
        assert_eq!(payload.content, "This is test content");
        assert!(payload.slug.is_none());
        assert!(payload.publish.is_none());
    }

    #[test]
    fn missing_and_empty_required_fields_are_distinguished() {
        let errors = field_errors(json!({"content": ""}));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "title");
        assert_eq!(errors[0].kind, FieldErrorKind::InvalidType);
        assert_eq!(errors[0].message, "Required");
        assert_eq!(errors[1].field, "content");
        assert_eq!(errors[1].kind, FieldErrorKind::TooSmall);
        assert_eq!(errors[1].message, "Content is required");
    }

    #[test]
    fn null_required_field_is_reported_as_required() {
        let errors = field_errors(json!({"title": null, "content": "x"}));
        assert_eq!(errors, vec![FieldError::invalid_type("title", "Required")]);
    }

    #[test]
    fn wrong_types_name_the_received_type() {
        let errors = field_errors(json!({"title": 42, "content": "x", "publish": "yes"}));
        assert_eq!(errors[0].message, "Expected string, received number");
        assert_eq!(errors[1].field, "publish");
        assert_eq!(errors[1].message, "Expected boolean, received string");
    }

    #[test]
    fn non_object_body_yields_single_root_error() {
        let errors = field_errors(json!(["title", "content"]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "");
        assert_eq!(errors[0].message, "Expected object, received array");
    }

    #[test]
    fn keyword_element_errors_use_dotted_paths() {
        let errors = field_errors(json!({
            "title": "t",
            "content": "c",
            "keywords": ["a", "b", 3]
        }));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "keywords.2");
    }

    #[test]
    fn camel_and_snake_case_normalize_identically() {
        let camel = validate_payload(&json!({
            "title": "T",
            "content": "C",
            "imageUrl": "https://img.example/a.png",
            "metaDescription": "desc",
            "keywords": ["k1"],
            "executionId": "exec-1"
        }))
        .unwrap();
        let snake = validate_payload(&json!({
            "title": "T",
            "content": "C",
            "featured_image": "https://img.example/a.png",
            "meta_description": "desc",
            "meta_keywords": ["k1"],
            "n8n_execution_id": "exec-1"
        }))
        .unwrap();
        assert_eq!(camel, snake);
    }

    #[test]
    fn camel_case_wins_when_both_present() {
        let payload = validate_payload(&json!({
            "title": "T",
            "content": "C",
            "metaDescription": "camel",
            "meta_description": "snake",
            "keywords": ["camel"],
            "meta_keywords": ["snake"]
        }))
        .unwrap();
        assert_eq!(payload.meta_description.as_deref(), Some("camel"));
        assert_eq!(payload.keywords, Some(vec!["camel".to_string()]));
    }

    #[test]
    fn empty_camel_case_falls_through_to_snake_case() {
        let payload = validate_payload(&json!({
            "title": "T",
            "content": "C",
            "imageUrl": "",
            "featured_image": "https://img.example/b.png",
            "slug": ""
        }))
        .unwrap();
        assert_eq!(payload.image_url.as_deref(), Some("https://img.example/b.png"));
        assert!(payload.slug.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        assert!(
            validate_payload(&json!({"title": "T", "content": "C", "category": "news"})).is_ok()
        );
    }

    #[test]
    fn canonical_payload_serializes_camel_case_without_absent_fields() {
        let payload = validate_payload(&json!({
            "title": "T",
            "content": "C",
            "n8n_execution_id": "exec-9",
            "publish": true
        }))
        .unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({"title": "T", "content": "C", "publish": true, "executionId": "exec-9"})
        );
    }

    #[test]
    fn field_error_serializes_field_and_message() {
        let value = serde_json::to_value(FieldError::too_small("title", "Title is required")).unwrap();
        assert_eq!(value, json!({"field": "title", "message": "Title is required"}));
    }
}
