use crate::imports::*;

pub mod builder;
pub mod parameter;
pub mod schema;

use std::collections::BTreeMap;
use std::fmt;

/*
    Types:
    * ParamType - Declared type of a parameter, drives built-in coercion
    * ParamValue - A coerced, typed parameter value
    * ParameterValues - Name -> value map produced by the resolver, consumed by FromParameters

    Traits:
    * FromParameters - Build a typed command input from resolved values
    * ToParameters - Reverse direction, used when a handler enqueues a typed follow-up
*/

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const TRUE_WORDS: &[&str] = &["1", "true", "yes", "y", "on"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Text,
    Int,
    Bool,
    Date,
    CommaList,
    CommaMap,
}

impl ParamType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::CommaList => "list",
            Self::CommaMap => "map",
        }
    }

    /// True when `value` already has this type's shape and can skip coercion.
    pub fn accepts(&self, value: &ParamValue) -> bool {
        matches!(
            (self, value),
            (Self::Text, ParamValue::Text(_))
                | (Self::Int, ParamValue::Int(_))
                | (Self::Bool, ParamValue::Bool(_))
                | (Self::Date, ParamValue::Date(_))
                | (Self::CommaList, ParamValue::List(_))
                | (Self::CommaMap, ParamValue::Map(_))
        )
    }

    pub fn coerce(&self, raw: &str) -> Result<ParamValue> {
        match self {
            Self::Text => Ok(ParamValue::Text(raw.to_string())),
            Self::Int => raw.trim().parse::<i64>().map(ParamValue::Int).map_err(|_| {
                AssistantError::invalid_command(format!("invalid integer value: '{raw}'"))
            }),
            Self::Bool => Ok(ParamValue::Bool(parse_bool(raw))),
            Self::Date => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .map(ParamValue::Date)
                .map_err(|_| {
                    AssistantError::invalid_command(format!(
                        "invalid date value: '{raw}', expected YYYY-MM-DD"
                    ))
                }),
            Self::CommaList => Ok(ParamValue::List(parse_list(raw))),
            Self::CommaMap => Ok(ParamValue::Map(parse_map(raw))),
        }
    }
}

pub fn parse_bool(raw: &str) -> bool {
    let lowered = raw.trim().to_lowercase();
    TRUE_WORDS.contains(&lowered.as_str())
}

pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

// Pairs that do not split into exactly one key and one value are dropped.
pub fn parse_map(raw: &str) -> BTreeMap<String, String> {
    raw.split(',')
        .filter_map(|part| {
            let pieces: Vec<&str> = part.split('=').collect();
            match pieces.as_slice() {
                [key, value] => Some((key.to_string(), value.to_string())),
                _ => None,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Date(NaiveDate),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
    Uid(Uuid),
}

impl ParamValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Date(_) => "date",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Uid(_) => "uid",
        }
    }

    /// Empty text and empty containers count as "not supplied". `false` and `0` do not.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Map(pairs) => pairs.is_empty(),
            _ => false,
        }
    }
}

// Canonical text form. Coercing it with the matching ParamType gives the value back.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Int(number) => write!(f, "{number}"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Self::List(items) => write!(f, "{}", items.join(",")),
            Self::Map(pairs) => {
                let joined = pairs
                    .iter()
                    .map(|(key, value)| format!("{key}={value}"))
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{joined}")
            }
            Self::Uid(uid) => write!(f, "{uid}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, String>> for ParamValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        Self::Map(value)
    }
}

impl From<Uuid> for ParamValue {
    fn from(value: Uuid) -> Self {
        Self::Uid(value)
    }
}

/// Builds `ParameterValues` from `name => value` pairs, values go through `Into<ParamValue>`.
#[macro_export]
macro_rules! params {
    () => {
        $crate::prelude::ParameterValues::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut values = $crate::prelude::ParameterValues::new();
        $(values.insert($key, $value);)+
        values
    }};
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterValues {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.values.iter()
    }

    // Typed getters. A type mismatch means the schema and the consumer disagree, which
    // is a bug rather than bad input.

    pub fn text(&self, name: &str) -> Result<Option<&str>> {
        match self.get(name) {
            None => Ok(None),
            Some(ParamValue::Text(text)) => Ok(Some(text.as_str())),
            Some(other) => Err(mismatch(name, other, "text")),
        }
    }

    pub fn required_text(&self, name: &str) -> Result<&str> {
        self.text(name)?.ok_or_else(|| missing(name))
    }

    pub fn int(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name) {
            None => Ok(None),
            Some(ParamValue::Int(number)) => Ok(Some(*number)),
            Some(other) => Err(mismatch(name, other, "int")),
        }
    }

    pub fn bool(&self, name: &str) -> Result<Option<bool>> {
        match self.get(name) {
            None => Ok(None),
            Some(ParamValue::Bool(flag)) => Ok(Some(*flag)),
            Some(other) => Err(mismatch(name, other, "bool")),
        }
    }

    pub fn date(&self, name: &str) -> Result<Option<NaiveDate>> {
        match self.get(name) {
            None => Ok(None),
            Some(ParamValue::Date(date)) => Ok(Some(*date)),
            Some(other) => Err(mismatch(name, other, "date")),
        }
    }

    /// Absent list parameters read as an empty list.
    pub fn list(&self, name: &str) -> Result<Vec<String>> {
        match self.get(name) {
            None => Ok(Vec::new()),
            Some(ParamValue::List(items)) => Ok(items.clone()),
            Some(other) => Err(mismatch(name, other, "list")),
        }
    }

    pub fn map(&self, name: &str) -> Result<BTreeMap<String, String>> {
        match self.get(name) {
            None => Ok(BTreeMap::new()),
            Some(ParamValue::Map(pairs)) => Ok(pairs.clone()),
            Some(other) => Err(mismatch(name, other, "map")),
        }
    }

    pub fn uid(&self, name: &str) -> Result<Option<Uuid>> {
        match self.get(name) {
            None => Ok(None),
            Some(ParamValue::Uid(uid)) => Ok(Some(*uid)),
            Some(other) => Err(mismatch(name, other, "uid")),
        }
    }

    pub fn required_uid(&self, name: &str) -> Result<Uuid> {
        self.uid(name)?.ok_or_else(|| missing(name))
    }
}

fn mismatch(name: &str, value: &ParamValue, expected: &str) -> anyhow::Error {
    AssistantError::programming(format!(
        "parameter `{name}` holds a {} value, expected {expected}",
        value.kind()
    ))
}

fn missing(name: &str) -> anyhow::Error {
    AssistantError::programming(format!("parameter `{name}` was not resolved"))
}

pub trait FromParameters: Sized {
    fn from_parameters(values: &ParameterValues) -> Result<Self>;
}

pub trait ToParameters {
    fn to_parameters(&self) -> ParameterValues;
}

impl FromParameters for ParameterValues {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(values.clone())
    }
}

impl ToParameters for ParameterValues {
    fn to_parameters(&self) -> ParameterValues {
        self.clone()
    }
}
