use crate::imports::*;

use super::MatchMode;

/*
    Types:
    * FieldValue - Borrowed view of one field of a record, as the engine sees it
    * SortKey - Normalized, totally ordered comparison value
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Null,
    Text(&'a str),
    List(&'a [String]),
    Date(NaiveDate),
    Uid(Uuid),
}

impl<'a> FieldValue<'a> {
    pub fn optional_text(value: Option<&'a str>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// `query` must already be normalized (lower-cased or parsed).
    pub fn matches(&self, mode: MatchMode, query: &str) -> bool {
        let compare = |candidate: &str| {
            let candidate = candidate.to_lowercase();
            match mode {
                MatchMode::Exact => candidate == query,
                MatchMode::Partial => candidate.contains(query),
            }
        };
        match self {
            Self::Null => false,
            Self::Text(text) => compare(text),
            Self::List(items) => items.iter().any(|item| compare(item)),
            Self::Date(date) => compare(&date.format(crate::spec::DATE_FORMAT).to_string()),
            Self::Uid(uid) => compare(&uid.to_string()),
        }
    }

    // Null sorts first through the empty-string sentinel. ISO dates order correctly as text.
    pub fn sort_key(&self) -> SortKey {
        match self {
            Self::Null => SortKey::Text(String::new()),
            Self::Text(text) => SortKey::Text(text.to_lowercase()),
            Self::List(items) => SortKey::List(items.iter().map(|item| item.to_lowercase()).collect()),
            Self::Date(date) => SortKey::Text(date.format(crate::spec::DATE_FORMAT).to_string()),
            Self::Uid(uid) => SortKey::Text(uid.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Text(String),
    List(Vec<String>),
}
