//! Review actions on base records
//!
//! Approve/reject/suspend style actions are sent to an [`ActionGateway`]
//! first. Only when the gateway accepts the request is the reviewed record
//! swapped into a new collection; on failure the caller keeps its
//! collection and gets a typed error it can offer to retry.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;

use crate::collection::RecordCollection;
use crate::error::{ActionError, QueryError, Result};
use crate::record::Record;
use crate::record::dynamic::STATUS_FIELD;
use crate::schema::{CollectionSchema, FieldType};

/// The person performing an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    /// Stable identifier of the actor
    pub id: String,
    /// Display name written to reviewed records
    pub name: String,
}

impl Actor {
    /// Create an actor
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A review decision on one record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// New status tag, e.g. `approved`
    pub status: String,
    /// Who decided
    pub actor: Actor,
    /// When the decision was made
    pub decided_at: DateTime<Utc>,
    /// Optional reviewer notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Review {
    /// A decision made now
    pub fn new(status: impl Into<String>, actor: Actor) -> Self {
        Self {
            status: status.into(),
            actor,
            decided_at: Utc::now(),
            notes: None,
        }
    }

    /// Set the decision time
    #[must_use]
    pub const fn at(mut self, decided_at: DateTime<Utc>) -> Self {
        self.decided_at = decided_at;
        self
    }

    /// Attach reviewer notes
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Check the new status against the schema's `status` tags
    ///
    /// # Errors
    /// `InvalidRecord` when the status is not a tag of the `status` enum.
    pub fn validate(&self, schema: &CollectionSchema) -> Result<()> {
        let Some(definition) = schema.field(STATUS_FIELD) else {
            return Ok(());
        };
        if definition.field_type == FieldType::Enum && !definition.accepts_tag(&self.status) {
            return Err(QueryError::InvalidRecord(format!(
                "'{}' is not a {} status, expected one of {:?}",
                self.status,
                schema.name(),
                definition.tags
            )));
        }
        Ok(())
    }
}

/// Records that can take a review decision
pub trait Reviewable: Sized {
    /// Return a copy of the record with the decision applied
    fn apply_review(&self, review: &Review) -> Self;
}

/// The request sent to the action service
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    /// Collection the record belongs to
    pub collection: String,
    /// Target record
    pub record_id: String,
    /// The decision
    pub review: Review,
}

/// An external service that carries out actions
pub trait ActionGateway {
    /// Submit a request; `Ok` means the action took effect
    fn submit(&self, request: &ActionRequest) -> std::result::Result<(), ActionError>;
}

impl<G: ActionGateway + ?Sized> ActionGateway for &G {
    fn submit(&self, request: &ActionRequest) -> std::result::Result<(), ActionError> {
        (**self).submit(request)
    }
}

/// In-process gateway that accepts every request
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalGateway;

impl ActionGateway for LocalGateway {
    fn submit(&self, request: &ActionRequest) -> std::result::Result<(), ActionError> {
        debug!(
            "Accepted '{}' on {}/{} by {}",
            request.review.status, request.collection, request.record_id, request.review.actor.id
        );
        Ok(())
    }
}

/// Review one record through a gateway
///
/// Returns the collection with the reviewed copy in place of the original.
///
/// # Errors
/// `RecordNotFound` for an unknown id, `Action` when the gateway fails.
pub fn apply_review<R, G>(
    collection: &RecordCollection<R>,
    collection_name: &str,
    id: &str,
    review: &Review,
    gateway: &G,
) -> Result<RecordCollection<R>>
where
    R: Record + Reviewable + Clone,
    G: ActionGateway + ?Sized,
{
    let record = collection
        .get(id)
        .ok_or_else(|| QueryError::RecordNotFound(id.to_string()))?;

    let request = ActionRequest {
        collection: collection_name.to_string(),
        record_id: id.to_string(),
        review: review.clone(),
    };

    if let Err(err) = gateway.submit(&request) {
        warn!(
            "Action '{}' on {collection_name}/{id} failed (retryable: {}): {err}",
            review.status,
            err.is_retryable()
        );
        return Err(err.into());
    }

    debug!(
        "Record {collection_name}/{id} set to '{}' by {}",
        review.status, review.actor.name
    );
    collection.with_replaced(record.apply_review(review))
}
