//! Field definitions for collection schemas
//!
//! This module defines the per-field declarations a screen supplies once:
//! the semantic type of each field, the tags an enum field may hold and the
//! children of a nested collection field.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents the semantic type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Text value
    Text,
    /// Fixed set of string tags (status, category)
    Enum,
    /// Date or timestamp
    Date,
    /// Numeric value
    Number,
    /// Boolean value
    Boolean,
    /// List of nested items, each with its own fields
    Collection,
}

impl FieldType {
    /// Whether free-text search may read this type
    #[must_use]
    pub const fn is_searchable(self) -> bool {
        matches!(self, Self::Text | Self::Enum)
    }

    /// Whether range filters (at least / at most / between) apply
    #[must_use]
    pub const fn is_ordered_scalar(self) -> bool {
        matches!(self, Self::Number | Self::Date)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Enum => write!(f, "enum"),
            Self::Date => write!(f, "date"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Collection => write!(f, "nested-collection"),
        }
    }
}

/// A field definition within a collection schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Name of the field as exposed by the record
    pub name: String,
    /// Human readable label
    pub label: String,
    /// Semantic type of the field
    pub field_type: FieldType,
    /// Allowed tags for enum fields; empty means unrestricted
    #[serde(default)]
    pub tags: Vec<String>,
    /// Fields of each item for collection fields
    #[serde(default)]
    pub children: Vec<FieldDefinition>,
}

impl FieldDefinition {
    /// Create a new field definition
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            field_type,
            tags: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Text field
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    /// Enum field restricted to the given tags
    pub fn enumeration<I, S>(name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = Self::new(name, FieldType::Enum);
        field.tags = tags.into_iter().map(Into::into).collect();
        field
    }

    /// Date field
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    /// Number field
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    /// Boolean field
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    /// Nested collection field whose items carry `children`
    pub fn collection(name: impl Into<String>, children: Vec<FieldDefinition>) -> Self {
        let mut field = Self::new(name, FieldType::Collection);
        field.children = children;
        field
    }

    /// Set the display label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Look up a child of a collection field
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&FieldDefinition> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Whether an enum field accepts the given tag
    #[must_use]
    pub fn accepts_tag(&self, tag: &str) -> bool {
        self.tags.is_empty() || self.tags.iter().any(|t| t == tag)
    }
}
