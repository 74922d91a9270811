//! Utility functions for procedural macros
//!
//! Type inspection helpers shared by the derive implementations.

use syn::Type;

/// Check if a type is an Option<T>
pub fn is_option_type(ty: &Type) -> bool {
    last_segment_is(ty, "Option")
}

/// Check if a type is a Vec<T>
pub fn is_vec_type(ty: &Type) -> bool {
    last_segment_is(ty, "Vec")
}

/// Resolve the name a field is exposed under
///
/// Uses the `name` attribute when present, otherwise the Rust identifier
/// with any raw-identifier prefix removed.
pub fn field_key(ident: &syn::Ident, renamed: Option<&str>) -> String {
    match renamed {
        Some(name) => name.to_string(),
        None => ident.to_string().trim_start_matches("r#").to_string(),
    }
}

fn last_segment_is(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == name),
        _ => false,
    }
}
