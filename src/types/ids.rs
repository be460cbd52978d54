use super::ValidationError;
use std::fmt;
use std::marker::PhantomData;

/// Strong typing for IDs with phantom types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

/// Marker types for different ID kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatabaseMarker;

/// Field name reported when an ID of this kind is missing.
pub trait IdKind {
    const FIELD: &'static str;
}

impl IdKind for PageMarker {
    const FIELD: &'static str = "page_id";
}

impl IdKind for DatabaseMarker {
    const FIELD: &'static str = "database_id";
}

/// Type aliases for specific ID types
pub type PageId = Id<PageMarker>;
pub type DatabaseId = Id<DatabaseMarker>;

impl<T: IdKind> Id<T> {
    /// Accepts any non-blank identifier.
    ///
    /// IDs are forwarded to Notion as given (dashed, undashed, or otherwise);
    /// Notion is the authority on whether one exists.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField(T::FIELD));
        }
        Ok(Self::from_normalized(trimmed.to_string()))
    }
}

impl<T> Id<T> {
    /// Create an ID from an already normalized string (internal use)
    pub(crate) fn from_normalized(value: String) -> Self {
        Self {
            value,
            _phantom: PhantomData,
        }
    }

    /// Get the ID as a string reference
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Whether the ID has the 32-hex-digit shape Notion hands out.
    pub fn looks_canonical(&self) -> bool {
        let compact = self.value.replace('-', "");
        compact.len() == 32 && compact.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parsing_trims() {
        let id = DatabaseId::parse("  550e8400e29b41d4a716446655440000 ").unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");
        assert!(id.looks_canonical());

        let id = DatabaseId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.as_str(), "550e8400-e29b-41d4-a716-446655440000");
        assert!(id.looks_canonical());
    }

    #[test]
    fn test_non_canonical_ids_are_forwarded() {
        let id = DatabaseId::parse("my-db").unwrap();
        assert_eq!(id.as_str(), "my-db");
        assert!(!id.looks_canonical());
    }

    #[test]
    fn test_blank_ids_rejected() {
        assert_eq!(
            DatabaseId::parse(""),
            Err(ValidationError::EmptyField("database_id"))
        );
        assert_eq!(
            PageId::parse("   "),
            Err(ValidationError::EmptyField("page_id"))
        );
    }
}
