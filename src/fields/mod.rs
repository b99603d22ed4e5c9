use crate::imports::*;

pub mod value;

/*
    Types:
    * MatchMode - How a filter query is compared against a field
    * FieldDescriptor - Declarative metadata for one model field
    * FieldRegistry - Immutable per-model table, looked up by canonical name or alias

    Registries are built once per model in a LazyLock static. A duplicate name or alias
    is a declaration bug and panics on first use.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive equality, any element for list fields.
    Exact,
    /// Case-insensitive substring, any element for list fields.
    Partial,
}

pub type QueryParser = fn(&str) -> Result<String>;

#[derive(Debug, Clone)]
pub struct FieldDescriptor<F> {
    pub field: F,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub match_mode: MatchMode,
    pub list_valued: bool,
    pub filterable: bool,
    pub sortable: bool,
    pub groupable: bool,
    pub parser: Option<QueryParser>,
}

impl<F> FieldDescriptor<F> {
    pub fn new(field: F, name: &'static str) -> Self {
        Self {
            field,
            name,
            aliases: &[],
            description: "",
            match_mode: MatchMode::Partial,
            list_valued: false,
            filterable: true,
            sortable: true,
            groupable: true,
            parser: None,
        }
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn exact(mut self) -> Self {
        self.match_mode = MatchMode::Exact;
        self
    }

    pub fn list(mut self) -> Self {
        self.list_valued = true;
        self
    }

    pub fn not_filterable(mut self) -> Self {
        self.filterable = false;
        self
    }

    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn not_groupable(mut self) -> Self {
        self.groupable = false;
        self
    }

    pub fn parser(mut self, parser: QueryParser) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Query text as it is compared against the field: parsed if the field declares a
    /// parser, lower-cased otherwise.
    pub fn normalize_query(&self, raw: &str) -> Result<String> {
        match self.parser {
            Some(parser) => parser(raw)
                .with_context(|| format!("invalid value for field '{}': '{raw}'", self.name)),
            None => Ok(raw.to_lowercase()),
        }
    }
}

#[derive(Debug)]
pub struct FieldRegistry<F> {
    model: &'static str,
    descriptors: Vec<FieldDescriptor<F>>,
    lookup: HashMap<String, usize>,
}

impl<F: Copy + PartialEq + std::fmt::Debug> FieldRegistry<F> {
    pub fn new(model: &'static str, descriptors: Vec<FieldDescriptor<F>>) -> Result<Self> {
        let mut lookup = HashMap::new();
        for (index, descriptor) in descriptors.iter().enumerate() {
            let keys = std::iter::once(descriptor.name).chain(descriptor.aliases.iter().copied());
            for key in keys {
                let key = key.trim().to_lowercase();
                if let Some(previous) = lookup.insert(key.clone(), index) {
                    return Err(AssistantError::programming(format!(
                        "{model}: '{key}' names both '{}' and '{}'",
                        descriptors[previous].name, descriptor.name
                    )));
                }
            }
        }
        Ok(Self {
            model,
            descriptors,
            lookup,
        })
    }

    /// Static registries use this; a bad declaration should stop the program early.
    pub fn build(model: &'static str, descriptors: Vec<FieldDescriptor<F>>) -> Self {
        match Self::new(model, descriptors) {
            Ok(registry) => registry,
            Err(err) => panic!("invalid field registry: {err}"),
        }
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    pub fn lookup(&self, key: &str) -> Result<&FieldDescriptor<F>> {
        let normalized = key.trim().to_lowercase();
        self.lookup
            .get(&normalized)
            .map(|index| &self.descriptors[*index])
            .ok_or_else(|| {
                AssistantError::invalid_command(format!(
                    "unknown field '{}' for {}",
                    key.trim(),
                    self.model
                ))
            })
    }

    /// Canonical name for a field name or alias. Case-insensitive and trimmed.
    pub fn resolve_field_name(&self, key: &str) -> Result<&'static str> {
        self.lookup(key).map(|descriptor| descriptor.name)
    }

    pub fn filterable(&self, key: &str) -> Result<&FieldDescriptor<F>> {
        let descriptor = self.lookup(key).map_err(|_| not_allowed("Filtering", key))?;
        match descriptor.filterable {
            true => Ok(descriptor),
            false => Err(not_allowed("Filtering", key)),
        }
    }

    pub fn sortable(&self, key: &str) -> Result<&FieldDescriptor<F>> {
        let descriptor = self.lookup(key).map_err(|_| not_allowed("Ordering", key))?;
        match descriptor.sortable {
            true => Ok(descriptor),
            false => Err(not_allowed("Ordering", key)),
        }
    }

    pub fn filterable_names(&self) -> Vec<&'static str> {
        self.names_where(|descriptor| descriptor.filterable)
    }

    pub fn sortable_names(&self) -> Vec<&'static str> {
        self.names_where(|descriptor| descriptor.sortable)
    }

    // Alphabetical, for prompts.
    fn names_where(&self, predicate: impl Fn(&FieldDescriptor<F>) -> bool) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .descriptors
            .iter()
            .filter(|descriptor| predicate(descriptor))
            .map(|descriptor| descriptor.name)
            .collect();
        names.sort_unstable();
        names
    }
}

fn not_allowed(action: &str, key: &str) -> anyhow::Error {
    AssistantError::invalid_command(format!("{action} by '{}' is not allowed", key.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Field {
        Uid,
        Name,
        Phones,
        Content,
    }

    fn registry() -> FieldRegistry<Field> {
        FieldRegistry::build(
            "test records",
            vec![
                FieldDescriptor::new(Field::Uid, "uid").exact(),
                FieldDescriptor::new(Field::Name, "name"),
                FieldDescriptor::new(Field::Phones, "phones")
                    .aliases(&["phone"])
                    .exact()
                    .list(),
                FieldDescriptor::new(Field::Content, "content").not_sortable(),
            ],
        )
    }

    #[test]
    fn test_resolves_names_and_aliases() {
        let registry = registry();
        assert_eq!(registry.resolve_field_name("name").unwrap(), "name");
        assert_eq!(registry.resolve_field_name("  PHONE ").unwrap(), "phones");
        assert_eq!(registry.resolve_field_name("Phones").unwrap(), "phones");
    }

    #[test]
    fn test_unknown_field_is_invalid_command() {
        let err = registry().resolve_field_name("favorite_color").unwrap_err();
        assert!(err.to_string().contains("'favorite_color'"));
        assert_eq!(AssistantError::find(&err).unwrap().title(), "Invalid Command");
    }

    #[test]
    fn test_capability_checks() {
        let registry = registry();
        assert!(registry.filterable("content").is_ok());
        let err = registry.sortable("content").unwrap_err();
        assert_eq!(err.to_string(), "Ordering by 'content' is not allowed");
        assert_eq!(registry.sortable_names(), vec!["name", "phones", "uid"]);
        assert_eq!(
            registry.filterable_names(),
            vec!["content", "name", "phones", "uid"]
        );
    }

    #[test]
    fn test_duplicate_alias_is_rejected() {
        let err = FieldRegistry::new(
            "broken",
            vec![
                FieldDescriptor::new(Field::Name, "name"),
                FieldDescriptor::new(Field::Content, "content").aliases(&["Name"]),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("'name' names both"));
    }
}
