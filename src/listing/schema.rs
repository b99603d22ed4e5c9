use crate::imports::*;

use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::spec::parameter::CustomPrompt;

/*
    Shared parameter schema for every `*_list` command:
    filter_mode, filter_query, order_mode, order_query

    Query prompts only appear when the matching mode asks for them, and query keys are
    normalized to canonical field names while resolving.
*/

pub fn list_schema<R: Record>() -> ParameterSchema {
    SchemaBuilder::new()
        .param(
            ParameterSpecBuilder::text("filter_mode")
                .description("which items to show")
                .format_hint("all | filter")
                .parser(|raw: &str| -> Result<ParamValue> {
                    let mode: FilterMode = raw.parse()?;
                    Ok(ParamValue::from(mode.as_str()))
                })
                .select(vec![
                    SelectOption::new(FilterMode::All.as_str(), "Show all"),
                    SelectOption::new(FilterMode::Filter.as_str(), "Filter"),
                ]),
        )
        .param(
            ParameterSpecBuilder::new("filter_query", ParamType::CommaMap)
                .format_hint("key=value,key2=value2")
                .default_with(|| ParamValue::Map(BTreeMap::new()))
                .custom_prompt(FilterQueryPrompt::<R>::new())
                .validator(|value: ParamValue| normalize_filter_keys::<R>(value)),
        )
        .param(
            ParameterSpecBuilder::text("order_mode")
                .description("how to order the items")
                .format_hint("default | custom")
                .parser(|raw: &str| -> Result<ParamValue> {
                    let mode: OrderMode = raw.parse()?;
                    Ok(ParamValue::from(mode.as_str()))
                })
                .select(vec![
                    SelectOption::new(OrderMode::Default.as_str(), "Use default"),
                    SelectOption::new(OrderMode::Custom.as_str(), "Customize"),
                ]),
        )
        .param(
            ParameterSpecBuilder::new("order_query", ParamType::CommaList)
                .format_hint("key,-key2")
                .default_with(|| ParamValue::List(Vec::new()))
                .custom_prompt(OrderQueryPrompt::<R>::new())
                .validator(|value: ParamValue| normalize_order_keys::<R>(value)),
        )
        .build()
}

fn normalize_filter_keys<R: Record>(value: ParamValue) -> Result<ParamValue> {
    let ParamValue::Map(pairs) = value else {
        return Ok(value);
    };
    let registry = R::fields();
    let mut normalized = BTreeMap::new();
    for (key, query) in pairs {
        let descriptor = registry.filterable(&key)?;
        if normalized.insert(descriptor.name.to_string(), query).is_some() {
            return Err(AssistantError::invalid_data(format!(
                "filter key '{}' is given more than once",
                descriptor.name
            )));
        }
    }
    Ok(ParamValue::Map(normalized))
}

fn normalize_order_keys<R: Record>(value: ParamValue) -> Result<ParamValue> {
    let ParamValue::List(keys) = value else {
        return Ok(value);
    };
    let registry = R::fields();
    let normalized = keys
        .iter()
        .map(|key| {
            let key = key.trim();
            let (sign, bare) = match key.strip_prefix('-') {
                Some(bare) => ("-", bare),
                None => ("", key),
            };
            let descriptor = registry.sortable(bare)?;
            Ok(format!("{sign}{}", descriptor.name))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ParamValue::List(normalized))
}

struct FilterQueryPrompt<R>(PhantomData<fn() -> R>);

impl<R> FilterQueryPrompt<R> {
    fn new() -> Self {
        Self(PhantomData)
    }
}

impl<R: Record> CustomPrompt for FilterQueryPrompt<R> {
    fn prompt(&self, resolved: &ParameterValues, console: &dyn Console) -> Result<Option<String>> {
        if resolved.text("filter_mode")? != Some(FilterMode::Filter.as_str()) {
            return Ok(None);
        }
        let message = format!(
            "Enter filter query. Format: key=value,key2=value2. Allowed keys: {}",
            R::fields().filterable_names().join(", ")
        );
        console.prompt_line(&message, None).map(Some)
    }
}

struct OrderQueryPrompt<R>(PhantomData<fn() -> R>);

impl<R> OrderQueryPrompt<R> {
    fn new() -> Self {
        Self(PhantomData)
    }
}

impl<R: Record> CustomPrompt for OrderQueryPrompt<R> {
    fn prompt(&self, resolved: &ParameterValues, console: &dyn Console) -> Result<Option<String>> {
        if resolved.text("order_mode")? != Some(OrderMode::Custom.as_str()) {
            return Ok(None);
        }
        let message = format!(
            "Enter order keys, '-' prefix for descending. Format: key,-key2. Allowed keys: {}",
            R::fields().sortable_names().join(", ")
        );
        console.prompt_line(&message, None).map(Some)
    }
}
