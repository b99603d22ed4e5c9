use crate::imports::*;

pub mod contact;
pub mod note;

use serde::{Serialize, de::DeserializeOwned};

/*
    Traits:
    * Record - A stored model the list engine and the generic commands can work with

    Each model names its fields with a closed enum. `field_value` is the accessor the
    engine filters and sorts through; the registry carries the matching metadata.
*/

pub trait Record: Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Field: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static;

    /// Display name, e.g. "Contact".
    const SINGULAR: &'static str;
    const PLURAL: &'static str;

    fn fields() -> &'static FieldRegistry<Self::Field>;

    fn uid(&self) -> Uuid;

    fn field_value(&self, field: Self::Field) -> FieldValue<'_>;

    /// One line, used by non-interactive listings and selection menus.
    fn summary(&self) -> String;

    fn card(&self) -> Vec<CardRow>;

    fn collection(data: &StoreData) -> &Vec<Self>;

    fn collection_mut(data: &mut StoreData) -> &mut Vec<Self>;
}

/// Field-registry parser for uid queries: accepts any case, compares hyphenated lower-case.
pub fn parse_uid_query(raw: &str) -> Result<String> {
    parse_uid(raw).map(|uid| uid.to_string())
}

/// Parameter parser for uid arguments.
pub fn parse_uid_param(raw: &str) -> Result<ParamValue> {
    parse_uid(raw).map(ParamValue::Uid)
}

fn parse_uid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AssistantError::invalid_command(format!("'{}' is not a valid uid", raw.trim())))
}

pub(crate) fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => "-".to_string(),
    }
}

pub(crate) fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
