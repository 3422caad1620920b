//! Book domain model.
//!
//! # Responsibility
//! - Define the stored record, the insert candidate and the wire projection.
//! - Define partial-update input and its reduction to effective fields.
//!
//! # Invariants
//! - Composite identity is `{business_id, title, author, year, pages}`;
//!   `edition` never takes part in duplicate detection.
//! - A patch field that is absent or empty is never written.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Surrogate key assigned by the storage layer on insert.
pub type StorageKey = Uuid;

/// Book as persisted in a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    /// Opaque storage identity; not part of any projection.
    pub storage_key: StorageKey,
    /// Caller-facing identifier. Uniqueness is not enforced by storage.
    pub business_id: String,
    pub title: String,
    pub author: String,
    pub edition: String,
    pub pages: String,
    pub year: String,
}

impl BookRecord {
    /// Reduces the record to its API/view shape.
    pub fn projection(&self) -> BookProjection {
        BookProjection {
            id: self.business_id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            pages: self.pages.clone(),
            edition: self.edition.clone(),
            year: self.year.clone(),
        }
    }

    /// Returns whether this record composite-matches `candidate`.
    pub fn matches(&self, candidate: &NewBook) -> bool {
        self.business_id == candidate.business_id
            && self.title == candidate.title
            && self.author == candidate.author
            && self.year == candidate.year
            && self.pages == candidate.pages
    }
}

/// Insert candidate: every business field, no storage key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub business_id: String,
    pub title: String,
    pub author: String,
    pub edition: String,
    pub pages: String,
    pub year: String,
}

impl NewBook {
    pub fn new(
        business_id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        edition: impl Into<String>,
        pages: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            business_id: business_id.into(),
            title: title.into(),
            author: author.into(),
            edition: edition.into(),
            pages: pages.into(),
            year: year.into(),
        }
    }

    /// Attaches a storage key, producing the persisted shape.
    pub fn into_record(self, storage_key: StorageKey) -> BookRecord {
        BookRecord {
            storage_key,
            business_id: self.business_id,
            title: self.title,
            author: self.author,
            edition: self.edition,
            pages: self.pages,
            year: self.year,
        }
    }
}

/// Reduced field mapping returned to API and view layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookProjection {
    pub id: String,
    pub title: String,
    pub author: String,
    pub pages: String,
    pub edition: String,
    pub year: String,
}

/// Mutable book field addressed by partial updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BookField {
    Title,
    Author,
    Pages,
    Edition,
    Year,
}

impl BookField {
    /// Column holding this field in a book collection.
    pub fn column(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Pages => "pages",
            Self::Edition => "edition",
            Self::Year => "year",
        }
    }
}

/// Partial-update input. `None` and `Some("")` both mean "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub pages: Option<String>,
    pub edition: Option<String>,
    pub year: Option<String>,
}

impl BookPatch {
    /// Returns the non-empty subset of this patch in field order.
    pub fn effective_fields(&self) -> FieldSet {
        let candidates = [
            (BookField::Title, &self.title),
            (BookField::Author, &self.author),
            (BookField::Pages, &self.pages),
            (BookField::Edition, &self.edition),
            (BookField::Year, &self.year),
        ];

        let entries = candidates
            .into_iter()
            .filter_map(|(field, value)| match value.as_deref() {
                Some(text) if !text.is_empty() => Some((field, text.to_string())),
                _ => None,
            })
            .collect();
        FieldSet { entries }
    }
}

/// Non-empty field assignments for a `$set`-style merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    entries: Vec<(BookField, String)>,
}

impl FieldSet {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, field: BookField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (BookField, &str)> {
        self.entries
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::{BookField, BookPatch, NewBook};
    use uuid::Uuid;

    #[test]
    fn effective_fields_skip_absent_and_empty_values() {
        let patch = BookPatch {
            title: Some(String::new()),
            year: Some("1925".to_string()),
            ..BookPatch::default()
        };

        let fields = patch.effective_fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get(BookField::Year), Some("1925"));
        assert_eq!(fields.get(BookField::Title), None);
    }

    #[test]
    fn empty_patch_has_no_effective_fields() {
        assert!(BookPatch::default().effective_fields().is_empty());
    }

    #[test]
    fn matches_ignores_edition() {
        let candidate = NewBook::new("b1", "Title", "Author", "first", "100", "2000");
        let mut record = candidate.clone().into_record(Uuid::new_v4());
        record.edition = "second".to_string();
        assert!(record.matches(&candidate));

        record.title = "Other".to_string();
        assert!(!record.matches(&candidate));
    }
}
