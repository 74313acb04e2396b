//! Value objects: equality by value, not identity.

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**; two instances
/// holding the same values are interchangeable.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Column width of every `name` column in the schema.
pub const MAX_NAME_LEN: usize = 100;

/// A validated role/user name.
///
/// The raw text is kept as supplied (no trimming): uniqueness is an exact,
/// case-sensitive match on what the client sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityName(String);

impl EntityName {
    /// Validate `raw` as the name of a `kind` ("Role", "User").
    pub fn parse(kind: &str, raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(DomainError::validation(format!("{kind} name cannot be empty.")));
        }
        if raw.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "{kind} name cannot exceed {MAX_NAME_LEN} characters."
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for EntityName {}

impl core::fmt::Display for EntityName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        for raw in ["", "   ", "\t\n"] {
            let err = EntityName::parse("Role", raw).unwrap_err();
            assert_eq!(err, DomainError::validation("Role name cannot be empty."));
        }
    }

    #[test]
    fn overlong_names_are_rejected() {
        let ok = "a".repeat(MAX_NAME_LEN);
        assert!(EntityName::parse("User", ok).is_ok());

        let err = EntityName::parse("User", "a".repeat(MAX_NAME_LEN + 1)).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("User name cannot exceed 100 characters.")
        );
    }

    #[test]
    fn names_are_kept_verbatim() {
        let name = EntityName::parse("Role", " Admin ").unwrap();
        assert_eq!(name.as_str(), " Admin ");
        assert_ne!(name, EntityName::parse("Role", "admin").unwrap());
    }
}
