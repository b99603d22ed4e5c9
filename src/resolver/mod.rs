use crate::imports::*;

use crate::spec::parameter::Interactive;

#[cfg(test)]
pub mod tests;

/*
    Types:
    * RawArg - A positional argument before coercion, either user text or an already-typed value

    Functions:
    (PUBLIC METHOD)
    * resolve_args - Shared path behind ParameterSchema::resolve and ::reresolve
    (PRIVATE METHODS)
    * run_interactive - Invokes the parameter's interactive strategy
    * coerce - Custom parser or built-in coercion
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawArg {
    Text(String),
    Value(ParamValue),
}

impl RawArg {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Value(value) => value.is_empty(),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Value(value) => value.to_string(),
        }
    }
}

fn non_empty(arg: Option<RawArg>) -> Option<RawArg> {
    arg.filter(|arg| !arg.is_empty())
}

fn missing_argument(spec: &ParameterSpec) -> anyhow::Error {
    AssistantError::invalid_command(format!("missing required argument `{}`", spec.name))
}

fn apply_default(spec: &ParameterSpec, arg: Option<RawArg>) -> Option<RawArg> {
    match non_empty(arg.clone()) {
        Some(arg) => Some(arg),
        None => spec.default_value().map(RawArg::Value).or(arg),
    }
}

#[tracing::instrument(skip_all, err, fields(params = schema.len(), supplied = args.len(), non_interactive = non_interactive))]
pub fn resolve_args(
    schema: &ParameterSchema,
    args: Vec<Option<RawArg>>,
    non_interactive: bool,
    console: &dyn Console,
) -> Result<ParameterValues> {
    // Count checks run before anything can prompt.
    if args.len() > schema.len() {
        return Err(AssistantError::invalid_command(format!(
            "too many arguments: expected at most {}, got {}",
            schema.len(),
            args.len()
        )));
    }
    if non_interactive && args.len() < schema.required_count() {
        return Err(AssistantError::invalid_command(format!(
            "not enough arguments: expected at least {}, got {}",
            schema.required_count(),
            args.len()
        )));
    }

    let mut values = ParameterValues::new();
    let mut args = args.into_iter();

    for spec in schema.specs() {
        let mut arg = apply_default(spec, args.next().flatten());

        let empty = non_empty(arg.clone()).is_none();
        if empty && spec.required && non_interactive {
            return Err(missing_argument(spec));
        }
        if arg.is_none() && non_interactive {
            tracing::debug!(param = %spec.name, "Optional parameter left absent");
            continue;
        }

        if empty && !non_interactive {
            if let Some(interactive) = &spec.interactive {
                tracing::debug!(param = %spec.name, strategy = ?interactive, "Prompting for parameter");
                arg = run_interactive(spec, interactive, &values, console)?;
                arg = apply_default(spec, arg);
            }
        }

        // Empty text never reaches coercion. An empty container default does.
        let arg = match arg {
            Some(RawArg::Text(text)) if text.is_empty() => None,
            other => other,
        };
        let arg = match arg {
            Some(arg) if !(arg.is_empty() && spec.required) => arg,
            _ if spec.required => return Err(missing_argument(spec)),
            _ => continue,
        };

        let raw = arg.to_text();
        let value = coerce(spec, arg).map_err(|err| tag_coercion_error(spec, &raw, err))?;
        let value = match &spec.validator {
            Some(validator) => validator.validate(value)?,
            None => value,
        };

        tracing::debug!(param = %spec.name, kind = value.kind(), "Parameter resolved");
        values.insert(spec.name.clone(), value);
    }

    Ok(values)
}

fn run_interactive(
    spec: &ParameterSpec,
    interactive: &Interactive,
    resolved: &ParameterValues,
    console: &dyn Console,
) -> Result<Option<RawArg>> {
    let arg = match interactive {
        Interactive::Prompt => {
            let text = console.prompt_line(&spec.prompt_text(), None)?;
            Some(RawArg::Text(text))
        }
        Interactive::Confirm { yes, no } => console
            .prompt_bool(&spec.confirm_text(), yes, no, !spec.required)?
            .map(|answer| RawArg::Value(ParamValue::Bool(answer))),
        Interactive::Select(options) => {
            if options.is_empty() {
                return Err(AssistantError::programming(format!(
                    "parameter `{}` selects from options, but none are declared",
                    spec.name
                )));
            }
            console
                .select(&format!("Choose {}", spec.name), options)?
                .map(RawArg::Text)
        }
        Interactive::Custom(prompt) => prompt.prompt(resolved, console)?.map(RawArg::Text),
    };
    Ok(non_empty(arg))
}

fn coerce(spec: &ParameterSpec, arg: RawArg) -> Result<ParamValue> {
    if let Some(parser) = &spec.parser {
        return parser.parse(&arg.to_text());
    }
    match arg {
        RawArg::Value(value) if spec.ty.accepts(&value) => Ok(value),
        other => spec.ty.coerce(&other.to_text()),
    }
}

// Keeps the error kind when the parser raised a typed error, defaults to InvalidCommand.
fn tag_coercion_error(spec: &ParameterSpec, raw: &str, err: anyhow::Error) -> anyhow::Error {
    let message = format!("can't parse argument `{}`: {raw}", spec.name);
    if AssistantError::find(&err).is_some() {
        err.context(message)
    } else {
        AssistantError::invalid_command(format!("{message} ({err})"))
    }
}
