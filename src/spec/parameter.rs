use crate::imports::*;

/*
    Types:
    * ParameterSpec - One declared input of a command
    * DefaultValue - Fixed default or a function producing one
    * Interactive - How an empty parameter is backfilled when running interactively

    Traits:
    * ValueParser - Replaces built-in coercion for a parameter
    * ValueValidator - Post-coercion check, may also normalize the value
    * CustomPrompt - Interactive callback that can look at the parameters resolved so far
*/

pub trait ValueParser: Send + Sync {
    fn parse(&self, raw: &str) -> Result<ParamValue>;
}

pub trait ValueValidator: Send + Sync {
    fn validate(&self, value: ParamValue) -> Result<ParamValue>;
}

pub trait CustomPrompt: Send + Sync {
    /// Returns raw text to coerce, or `None` to leave the parameter empty.
    fn prompt(&self, resolved: &ParameterValues, console: &dyn Console) -> Result<Option<String>>;
}

// Plain functions are the common case for parsers and validators.
impl<F> ValueParser for F
where
    F: Fn(&str) -> Result<ParamValue> + Send + Sync,
{
    fn parse(&self, raw: &str) -> Result<ParamValue> {
        self(raw)
    }
}

impl<F> ValueValidator for F
where
    F: Fn(ParamValue) -> Result<ParamValue> + Send + Sync,
{
    fn validate(&self, value: ParamValue) -> Result<ParamValue> {
        self(value)
    }
}

#[derive(Clone)]
pub enum DefaultValue {
    Fixed(ParamValue),
    Factory(fn() -> ParamValue),
}

impl DefaultValue {
    pub fn produce(&self) -> ParamValue {
        match self {
            Self::Fixed(value) => value.clone(),
            Self::Factory(factory) => factory(),
        }
    }
}

#[derive(Clone)]
pub enum Interactive {
    Prompt,
    /// Yes/no dialog. Optional parameters also get a skip choice.
    Confirm { yes: String, no: String },
    Select(Vec<SelectOption>),
    Custom(Arc<dyn CustomPrompt>),
}

impl std::fmt::Debug for Interactive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prompt => write!(f, "Prompt"),
            Self::Confirm { yes, no } => write!(f, "Confirm({yes}/{no})"),
            Self::Select(options) => write!(f, "Select({} options)", options.len()),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

#[derive(Clone)]
pub struct ParameterSpec {
    pub(crate) name: String,
    pub(crate) ty: ParamType,
    pub(crate) required: bool,
    pub(crate) description: Option<String>,
    pub(crate) prompt_text: Option<String>,
    pub(crate) format_hint: Option<String>,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) interactive: Option<Interactive>,
    pub(crate) parser: Option<Arc<dyn ValueParser>>,
    pub(crate) validator: Option<Arc<dyn ValueValidator>>,
}

impl ParameterSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn interactive(&self) -> Option<&Interactive> {
        self.interactive.as_ref()
    }

    pub fn default_value(&self) -> Option<ParamValue> {
        self.default.as_ref().map(DefaultValue::produce)
    }

    /// `<name>` for required parameters, `[name]` for optional ones.
    pub fn usage(&self) -> String {
        if self.required {
            format!("<{}>", self.name)
        } else {
            format!("[{}]", self.name)
        }
    }

    pub fn prompt_text(&self) -> String {
        if let Some(text) = &self.prompt_text {
            return text.clone();
        }
        let mut text = format!("Enter {}", self.name);
        if let Some(description) = &self.description {
            text.push_str(&format!(" - {description}"));
        }
        if !self.required {
            text.push_str(" (optional)");
        }
        if let Some(hint) = &self.format_hint {
            text.push_str(&format!(" ({hint})"));
        }
        match &self.default {
            Some(DefaultValue::Fixed(value)) if !value.is_empty() => {
                text.push_str(&format!(" (or skip for default: '{value}')"));
            }
            Some(DefaultValue::Factory(_)) => text.push_str(" (or skip for default)"),
            _ => {}
        }
        text
    }

    // Yes/no dialogs phrase the question differently from text prompts.
    pub fn confirm_text(&self) -> String {
        if let Some(text) = &self.prompt_text {
            return text.clone();
        }
        match &self.description {
            Some(description) => format!("Select '{}' - {description}", self.name),
            None => format!("Select '{}'", self.name),
        }
    }
}

impl std::fmt::Debug for ParameterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterSpec")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("required", &self.required)
            .field("interactive", &self.interactive)
            .field("has_default", &self.default.is_some())
            .field("has_parser", &self.parser.is_some())
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}
