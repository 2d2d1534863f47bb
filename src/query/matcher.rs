//! Free-text search across a configured set of string fields.

use super::Record;

/// Case-insensitive substring search over named record fields.
///
/// The query is normalized once on construction so a matcher can be
/// reused across a whole collection.
#[derive(Debug, Clone)]
pub struct FieldMatcher<'a> {
    needle: String,
    fields: &'a [&'a str],
}

impl<'a> FieldMatcher<'a> {
    pub fn new(query: &str, fields: &'a [&'a str]) -> Self {
        Self {
            needle: query.to_lowercase(),
            fields,
        }
    }

    /// True when the query is empty or any configured field contains it.
    ///
    /// A field the record does not have is a non-match for that field only.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        self.fields.iter().any(|name| {
            record
                .field(name)
                .is_some_and(|value| value.to_lowercase().contains(&self.needle))
        })
    }
}

/// One-shot form of [`FieldMatcher::matches`].
pub fn matches<R: Record + ?Sized>(record: &R, query: &str, fields: &[&str]) -> bool {
    FieldMatcher::new(query, fields).matches(record)
}
