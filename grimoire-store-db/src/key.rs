// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Synthetic `_key` addressing used by the pack extractor and compiler.
//!
//! Top-level documents are addressed as `!<document_type>!<id>`, embedded
//! children as `!<parent_type>.<child_collection>!<parent_id>.<child_id>`.

use crate::error::{Error, Result};

/// Embedded collection owned by a document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Embedded {
    /// Items embedded in an actor
    Items,
    /// Pages of a journal entry
    Pages,
    /// Results of a roll table
    Results,
}

impl Embedded {
    /// Collection embedded in documents of `document_type`, if any.
    pub fn for_document_type(document_type: &str) -> Option<Self> {
        match document_type {
            "actors" => Some(Self::Items),
            "journal" => Some(Self::Pages),
            "tables" => Some(Self::Results),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Pages => "pages",
            Self::Results => "results",
        }
    }
}

/// Key of a top-level document.
pub fn document_key(document_type: &str, id: &str) -> String {
    format!("!{document_type}!{id}")
}

/// Key of a child embedded in a document.
pub fn embedded_key(document_type: &str, collection: Embedded, parent_id: &str, id: &str) -> String {
    format!("!{document_type}.{}!{parent_id}.{id}", collection.name())
}

/// Extract the document type from a top-level key, checking it addresses `id`.
pub fn document_type_of<'a>(key: &'a str, id: &str) -> Result<&'a str> {
    let invalid = || Error::InvalidKey {
        document_id: id.to_owned(),
        key: key.to_owned(),
    };
    let rest = key.strip_prefix('!').ok_or_else(invalid)?;
    let (document_type, key_id) = rest.split_once('!').ok_or_else(invalid)?;
    if document_type.is_empty() || document_type.contains('.') || key_id != id {
        return Err(invalid());
    }
    Ok(document_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("!actors!abc", "abc", "actors")]
    #[case("!items!X1y2", "X1y2", "items")]
    #[case("!journal!j", "j", "journal")]
    #[case("!tables!t", "t", "tables")]
    #[case("!macros!m", "m", "macros")]
    fn test_document_type_of(#[case] key: &str, #[case] id: &str, #[case] expected: &str) {
        assert_eq!(document_type_of(key, id).unwrap(), expected);
        assert_eq!(document_key(expected, id), key);
    }

    #[rstest]
    #[case::no_bang("actors!abc", "abc")]
    #[case::no_id("!actors", "abc")]
    #[case::other_id("!actors!xyz", "abc")]
    #[case::embedded("!actors.items!abc.def", "abc.def")]
    #[case::empty_type("!!abc", "abc")]
    fn test_invalid_keys(#[case] key: &str, #[case] id: &str) {
        assert!(matches!(
            document_type_of(key, id),
            Err(Error::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_embedded_key() {
        assert_eq!(
            embedded_key("actors", Embedded::Items, "a1", "i1"),
            "!actors.items!a1.i1"
        );
        assert_eq!(
            embedded_key("journal", Embedded::Pages, "j1", "p1"),
            "!journal.pages!j1.p1"
        );
        assert_eq!(
            embedded_key("tables", Embedded::Results, "t1", "r1"),
            "!tables.results!t1.r1"
        );
    }

    #[test]
    fn test_embedded_for_document_type() {
        assert_eq!(Embedded::for_document_type("actors"), Some(Embedded::Items));
        assert_eq!(Embedded::for_document_type("journal"), Some(Embedded::Pages));
        assert_eq!(Embedded::for_document_type("tables"), Some(Embedded::Results));
        assert_eq!(Embedded::for_document_type("items"), None);
    }
}
