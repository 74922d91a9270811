//! Collection schema definition
//!
//! A `CollectionSchema` is the static declaration a screen supplies once per
//! entity type: which fields exist and which of them may be searched,
//! filtered, sorted and aggregated. It is validated when built so that
//! queries only have to check criteria against it.

use std::collections::HashSet;

use smallvec::SmallVec;

use crate::error::{QueryError, Result};
use crate::filter::search::SearchField;
use crate::schema::field::{FieldDefinition, FieldType};
use crate::sort::SortSpec;
use crate::summary::AggregateSpec;

/// A validated schema for one collection type
#[derive(Debug, Clone)]
pub struct CollectionSchema {
    name: String,
    fields: Vec<FieldDefinition>,
    searchable: SmallVec<[SearchField; 4]>,
    filterable: Vec<String>,
    sortable: Vec<String>,
    default_sort: Option<SortSpec>,
    aggregates: Vec<AggregateSpec>,
}

impl CollectionSchema {
    /// Start declaring a schema
    pub fn builder(name: impl Into<String>) -> CollectionSchemaBuilder {
        CollectionSchemaBuilder::new(name)
    }

    /// The collection name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All declared fields
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Fields read by free-text search
    #[must_use]
    pub fn searchable(&self) -> &[SearchField] {
        &self.searchable
    }

    /// Fields that accept filters
    #[must_use]
    pub fn filterable(&self) -> &[String] {
        &self.filterable
    }

    /// Fields that accept sorting
    #[must_use]
    pub fn sortable(&self) -> &[String] {
        &self.sortable
    }

    /// Sort applied when criteria name none
    #[must_use]
    pub const fn default_sort(&self) -> Option<&SortSpec> {
        self.default_sort.as_ref()
    }

    /// Stat-card aggregates
    #[must_use]
    pub fn aggregates(&self) -> &[AggregateSpec] {
        &self.aggregates
    }

    /// Get a field definition by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Get a field definition by name, failing with `UnknownField`
    pub fn require_field(&self, name: &str) -> Result<&FieldDefinition> {
        self.field(name).ok_or_else(|| QueryError::UnknownField {
            collection: self.name.clone(),
            field: name.to_string(),
        })
    }

    /// Check if a field accepts filters
    #[must_use]
    pub fn is_filterable(&self, name: &str) -> bool {
        self.filterable.iter().any(|f| f == name)
    }

    /// Check if a field accepts sorting
    #[must_use]
    pub fn is_sortable(&self, name: &str) -> bool {
        self.sortable.iter().any(|f| f == name)
    }
}

/// Builder for `CollectionSchema`
#[derive(Debug, Clone)]
pub struct CollectionSchemaBuilder {
    name: String,
    fields: Vec<FieldDefinition>,
    searchable: SmallVec<[SearchField; 4]>,
    filterable: Vec<String>,
    sortable: Vec<String>,
    default_sort: Option<SortSpec>,
    aggregates: Vec<AggregateSpec>,
}

impl CollectionSchemaBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            searchable: SmallVec::new(),
            filterable: Vec::new(),
            sortable: Vec::new(),
            default_sort: None,
            aggregates: Vec::new(),
        }
    }

    /// Declare a field
    #[must_use]
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Make a text or enum field searchable
    #[must_use]
    pub fn searchable(mut self, name: impl Into<String>) -> Self {
        self.searchable.push(SearchField::field(name));
        self
    }

    /// Make a text field of each nested collection item searchable
    #[must_use]
    pub fn searchable_nested(
        mut self,
        collection: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        self.searchable.push(SearchField::nested(collection, field));
        self
    }

    /// Make a field filterable
    #[must_use]
    pub fn filterable(mut self, name: impl Into<String>) -> Self {
        self.filterable.push(name.into());
        self
    }

    /// Make a field sortable
    #[must_use]
    pub fn sortable(mut self, name: impl Into<String>) -> Self {
        self.sortable.push(name.into());
        self
    }

    /// Sort applied when criteria name none
    #[must_use]
    pub fn default_sort(mut self, sort: SortSpec) -> Self {
        self.default_sort = Some(sort);
        self
    }

    /// Add a stat-card aggregate
    #[must_use]
    pub fn aggregate(mut self, spec: AggregateSpec) -> Self {
        self.aggregates.push(spec);
        self
    }

    /// Validate the declarations and build the schema
    pub fn build(self) -> Result<CollectionSchema> {
        let schema = CollectionSchema {
            name: self.name,
            fields: self.fields,
            searchable: self.searchable,
            filterable: self.filterable,
            sortable: self.sortable,
            default_sort: self.default_sort,
            aggregates: self.aggregates,
        };

        validate_schema(&schema)?;
        log::debug!(
            "Declared collection '{}' with {} fields, {} searchable, {} aggregates",
            schema.name,
            schema.fields.len(),
            schema.searchable.len(),
            schema.aggregates.len()
        );

        Ok(schema)
    }
}

fn validate_schema(schema: &CollectionSchema) -> Result<()> {
    let mut seen = HashSet::new();
    for field in &schema.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(QueryError::Schema(format!(
                "field '{}' declared twice in '{}'",
                field.name, schema.name
            )));
        }
        if field.field_type == FieldType::Collection && field.children.is_empty() {
            return Err(QueryError::Schema(format!(
                "collection field '{}' declares no item fields",
                field.name
            )));
        }
    }

    for search in &schema.searchable {
        let target = match search {
            SearchField::Field(name) => schema.require_field(name)?,
            SearchField::Nested { collection, field } => {
                let parent = schema.require_field(collection)?;
                if parent.field_type != FieldType::Collection {
                    return Err(QueryError::Schema(format!(
                        "'{collection}' is not a nested collection"
                    )));
                }
                parent.child(field).ok_or_else(|| QueryError::UnknownField {
                    collection: schema.name.clone(),
                    field: format!("{collection}.{field}"),
                })?
            }
        };
        if !target.field_type.is_searchable() {
            return Err(QueryError::Schema(format!(
                "search field '{}' is {}, only text and enum fields are searchable",
                target.name, target.field_type
            )));
        }
    }

    for name in &schema.filterable {
        let field = schema.require_field(name)?;
        if field.field_type == FieldType::Collection {
            return Err(QueryError::Schema(format!(
                "nested collection '{name}' cannot be filtered"
            )));
        }
    }

    for name in &schema.sortable {
        schema.require_field(name)?;
    }

    if let Some(sort) = &schema.default_sort {
        if !schema.is_sortable(&sort.key) {
            return Err(QueryError::InvalidSortKey {
                collection: schema.name.clone(),
                key: sort.key.clone(),
            });
        }
    }

    let mut labels = HashSet::new();
    for spec in &schema.aggregates {
        if !labels.insert(spec.label.as_str()) {
            return Err(QueryError::InvalidAggregate {
                label: spec.label.clone(),
                reason: "label used twice".to_string(),
            });
        }
        spec.validate(schema)?;
    }

    Ok(())
}
