//! Small helpers shared across the crate.
//!
//! - Macros for builder-style `with_*` setters and plain getters.
//! - Parsing helpers for FlowJo-style well identifiers and column names.

#[macro_export]
macro_rules! getter_fn {
    ($field_name: ident, $field_type: ty) => {
        pub fn $field_name(&self) -> &$field_type {
            &self.$field_name
        }
    };
}
pub use getter_fn;

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
            self.$field_name = value;
            self
            }
        }
    };
}
pub use with_field_fn;

/// Extracts the channel token from a cytometry column name.
///
/// `"... | Geometric Mean (FL2-A :: 355nm450-45-A)"` yields `"355nm450-45-A"`.
/// Column names without a `::` separator are returned trimmed.
pub fn channel_token(column: &str) -> String {
    match column.split_once("::") {
        Some((_, rest)) => rest
            .trim()
            .split(' ')
            .next()
            .unwrap_or_default()
            .split(')')
            .next()
            .unwrap_or_default()
            .to_string(),
        None => column.trim().to_string(),
    }
}

/// Trailing decimal number of a well identifier (`"C12"` -> `12`).
pub fn trailing_number(well: &str) -> Option<usize> {
    let digits_start = well
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(idx, _)| idx)?;
    well[digits_start..].parse().ok()
}

/// Takes the first `len` characters of `s`, or all of it when shorter.
pub fn char_prefix(
    s: &str,
    len: usize,
) -> &str {
    match s.char_indices().nth(len) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
