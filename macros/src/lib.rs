//! Procedural macros for the record-query crate
//!
//! This crate provides derive macros that generate the field accessors the
//! query pipeline needs, removing the hand-written `match name { .. }` blocks
//! every record type would otherwise carry.

use proc_macro::TokenStream;

// Import modules
mod record_impl;
mod utils;


/// Derive macro for the `Record` trait
///
/// Generates both `FieldSource` (string-keyed field access) and `Record`
/// (stable identifier) for a struct with named fields.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Record)]
/// #[record(id = "id")]
/// struct Registration {
///     id: String,
///
///     #[field(name = "associationName")]
///     association_name: String,
///
///     #[field(kind = "enum")]
///     status: RegistrationStatus,
///
///     #[field(name = "submittedAt")]
///     submitted_at: chrono::NaiveDate,
///
///     #[field(kind = "nested")]
///     documents: Vec<Document>,
///
///     #[field(skip)]
///     internal_notes: String,
/// }
/// ```
///
/// The `id` field must be `AsRef<str>`. Plain fields must implement
/// `ToFieldValue`, `kind = "enum"` fields must implement `Display`, and
/// `kind = "nested"` fields must be a `Vec` of a `FieldSource` type.
#[proc_macro_derive(Record, attributes(record, field))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record_impl::process_derive_record(input)
}

/// Derive macro for the `FieldSource` trait
///
/// Used for items of nested collections (participants, documents, products)
/// that expose searchable fields but carry no identifier of their own.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(FieldSource)]
/// struct Participant {
///     name: String,
///     #[field(kind = "enum")]
///     role: ParticipantRole,
/// }
/// ```
#[proc_macro_derive(FieldSource, attributes(field))]
pub fn derive_field_source(input: TokenStream) -> TokenStream {
    record_impl::process_derive_field_source(input)
}
