use crate::imports::*;

pub mod schema;

use std::collections::BTreeMap;
use std::str::FromStr;

/*
    Types:
    * FilterMode - ALL passes everything, FILTER applies the query
    * OrderMode - DEFAULT keeps insertion order, CUSTOM applies signed sort keys
    * ListRequest - Filter plus sort request against one model collection

    Functions:
    * apply - Run a ListRequest over a collection of records
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    All,
    Filter,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Filter => "filter",
        }
    }
}

impl FromStr for FilterMode {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "filter" => Ok(Self::Filter),
            other => Err(AssistantError::invalid_command(format!(
                "unknown filter mode '{other}', expected 'all' or 'filter'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderMode {
    Default,
    Custom,
}

impl OrderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for OrderMode {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "custom" => Ok(Self::Custom),
            other => Err(AssistantError::invalid_command(format!(
                "unknown order mode '{other}', expected 'default' or 'custom'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub filter_mode: Option<FilterMode>,
    pub filter_query: BTreeMap<String, String>,
    pub order_mode: Option<OrderMode>,
    pub order_query: Vec<String>,
}

impl ListRequest {
    pub fn all() -> Self {
        Self {
            filter_mode: Some(FilterMode::All),
            order_mode: Some(OrderMode::Default),
            ..Self::default()
        }
    }

    pub fn filter(mut self, key: &str, value: &str) -> Self {
        self.filter_mode = Some(FilterMode::Filter);
        self.filter_query.insert(key.to_string(), value.to_string());
        self
    }

    pub fn order_by(mut self, keys: &[&str]) -> Self {
        self.order_mode = Some(OrderMode::Custom);
        self.order_query = keys.iter().map(|key| key.to_string()).collect();
        self
    }
}

impl FromParameters for ListRequest {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            filter_mode: values.text("filter_mode")?.map(str::parse).transpose()?,
            filter_query: values.map("filter_query")?,
            order_mode: values.text("order_mode")?.map(str::parse).transpose()?,
            order_query: values.list("order_query")?,
        })
    }
}

impl ToParameters for ListRequest {
    fn to_parameters(&self) -> ParameterValues {
        let mut values = ParameterValues::new();
        if let Some(mode) = self.filter_mode {
            values.insert("filter_mode", mode.as_str());
        }
        values.insert("filter_query", self.filter_query.clone());
        if let Some(mode) = self.order_mode {
            values.insert("order_mode", mode.as_str());
        }
        values.insert("order_query", self.order_query.clone());
        values
    }
}

struct SortSpec<F> {
    field: F,
    descending: bool,
}

/// Filter and order `items` per `request`. Returns references in result order; the
/// input collection is never touched.
#[tracing::instrument(skip_all, err, fields(model = R::fields().model(), filter = ?request.filter_mode, order = ?request.order_mode))]
pub fn apply<'a, R, I>(items: I, request: &ListRequest) -> Result<Vec<&'a R>>
where
    R: Record,
    I: IntoIterator<Item = &'a R>,
{
    let registry = R::fields();

    let filter_mode = request
        .filter_mode
        .ok_or_else(|| AssistantError::programming("filter mode is not specified"))?;
    let order_mode = request
        .order_mode
        .ok_or_else(|| AssistantError::programming("order mode is not specified"))?;

    // Resolve every key before looking at any item.
    let conditions = match filter_mode {
        FilterMode::All => Vec::new(),
        FilterMode::Filter => {
            if request.filter_query.is_empty() {
                return Err(AssistantError::invalid_command(
                    "filter mode requires at least one key=value pair",
                ));
            }
            request
                .filter_query
                .iter()
                .map(|(key, raw)| {
                    let descriptor = registry.filterable(key)?;
                    Ok((descriptor, descriptor.normalize_query(raw)?))
                })
                .collect::<Result<Vec<_>>>()?
        }
    };
    let sort_specs = match order_mode {
        OrderMode::Default => Vec::new(),
        OrderMode::Custom => request
            .order_query
            .iter()
            .map(|key| {
                let key = key.trim();
                let (descending, key) = match key.strip_prefix('-') {
                    Some(stripped) => (true, stripped),
                    None => (false, key),
                };
                let descriptor = registry.sortable(key)?;
                Ok(SortSpec {
                    field: descriptor.field,
                    descending,
                })
            })
            .collect::<Result<Vec<_>>>()?,
    };

    let mut selected: Vec<&'a R> = items
        .into_iter()
        .filter(|item| {
            conditions.iter().all(|(descriptor, query)| {
                let value = item.field_value(descriptor.field);
                !value.is_null() && value.matches(descriptor.match_mode, query)
            })
        })
        .collect();

    // Stable sort once per key, last key first, so the first declared key dominates.
    for spec in sort_specs.iter().rev() {
        selected.sort_by(|left, right| {
            let ordering = left
                .field_value(spec.field)
                .sort_key()
                .cmp(&right.field_value(spec.field).sort_key());
            if spec.descending { ordering.reverse() } else { ordering }
        });
    }

    tracing::debug!(selected = selected.len(), "List request applied");
    Ok(selected)
}
