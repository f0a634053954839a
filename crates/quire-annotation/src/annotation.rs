//! Annotation records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied annotation fields (everything except id and position).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationData {
    /// CSS class applied to the annotated text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Arbitrary caller fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnnotationData {
    /// Data with only a class name.
    pub fn with_class(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            extra: Map::new(),
        }
    }

    /// Attach an extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A range annotation. Annotations may overlap freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Unique id.
    pub id: String,
    /// Start position (inclusive).
    pub from: usize,
    /// End position (exclusive).
    pub to: usize,
    /// Class name and caller fields.
    #[serde(flatten)]
    pub data: AnnotationData,
}

impl Annotation {
    /// Create an annotation over `from..to`.
    pub fn new(id: impl Into<String>, from: usize, to: usize) -> Self {
        Self {
            id: id.into(),
            from,
            to,
            data: AnnotationData::default(),
        }
    }

    /// Attach data.
    pub fn with_data(mut self, data: AnnotationData) -> Self {
        self.data = data;
        self
    }

    /// Length of the annotated range.
    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    /// Returns `true` for a collapsed range.
    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }

    /// Merge `data` into this annotation: a present class name replaces the old one, extra
    /// fields overwrite keys of the same name.
    pub fn merge(&mut self, data: &AnnotationData) {
        if data.class_name.is_some() {
            self.data.class_name = data.class_name.clone();
        }
        for (key, value) in &data.extra {
            self.data.extra.insert(key.clone(), value.clone());
        }
    }
}

/// An annotation together with the document text it currently covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationWithText {
    /// The annotation.
    #[serde(flatten)]
    pub annotation: Annotation,
    /// Covered text.
    pub text: String,
}

/// A maximal range covered by one fixed set of annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Start position (inclusive).
    pub from: usize,
    /// End position (exclusive).
    pub to: usize,
    /// Annotations covering the whole segment.
    pub annotations: Vec<Annotation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serde_flattens_extra_fields() {
        let data = AnnotationData::with_class("note").with_field("author", "kim");
        let annotation = Annotation::new("a1", 2, 5).with_data(data);
        let value = serde_json::to_value(&annotation).unwrap();
        assert_eq!(
            value,
            json!({"id": "a1", "from": 2, "to": 5, "className": "note", "author": "kim"})
        );

        let back: Annotation = serde_json::from_value(value).unwrap();
        assert_eq!(back, annotation);
    }

    #[test]
    fn test_merge_keeps_unmentioned_fields() {
        let data = AnnotationData::with_class("note").with_field("author", "kim");
        let mut annotation = Annotation::new("a1", 0, 1).with_data(data);
        let resolved = AnnotationData::default().with_field("resolved", true);
        annotation.merge(&resolved);
        assert_eq!(annotation.data.class_name.as_deref(), Some("note"));
        assert_eq!(annotation.data.extra.len(), 2);
    }
}
