use crate::imports::*;

use super::parameter::{CustomPrompt, DefaultValue, Interactive, ValueParser, ValueValidator};

/*
    Types:
    * ParameterSpecBuilder - Builder for ParameterSpec
    * SchemaBuilder - Collects specs and validates ordering on build
*/

pub struct ParameterSpecBuilder {
    spec: ParameterSpec,
}

impl ParameterSpecBuilder {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            spec: ParameterSpec {
                name: name.into(),
                ty,
                required: false,
                description: None,
                prompt_text: None,
                format_hint: None,
                default: None,
                interactive: None,
                parser: None,
                validator: None,
            },
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Text)
    }

    pub fn required(mut self) -> Self {
        self.spec.required = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.spec.description = Some(description.into());
        self
    }

    /// Replaces the generated prompt text entirely.
    pub fn prompt_text(mut self, text: impl Into<String>) -> Self {
        self.spec.prompt_text = Some(text.into());
        self
    }

    pub fn format_hint(mut self, hint: impl Into<String>) -> Self {
        self.spec.format_hint = Some(hint.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<ParamValue>) -> Self {
        self.spec.default = Some(DefaultValue::Fixed(value.into()));
        self
    }

    pub fn default_with(mut self, factory: fn() -> ParamValue) -> Self {
        self.spec.default = Some(DefaultValue::Factory(factory));
        self
    }

    /// Ask for the value when it is empty. Bool parameters get a yes/no dialog, everything
    /// else a text prompt.
    pub fn interactive(mut self) -> Self {
        self.spec.interactive = Some(match self.spec.ty {
            ParamType::Bool => Interactive::Confirm {
                yes: "Yes".to_string(),
                no: "No".to_string(),
            },
            _ => Interactive::Prompt,
        });
        self
    }

    pub fn confirm(mut self, yes: impl Into<String>, no: impl Into<String>) -> Self {
        self.spec.interactive = Some(Interactive::Confirm {
            yes: yes.into(),
            no: no.into(),
        });
        self
    }

    pub fn select(mut self, options: Vec<SelectOption>) -> Self {
        self.spec.interactive = Some(Interactive::Select(options));
        self
    }

    pub fn custom_prompt(mut self, prompt: impl CustomPrompt + 'static) -> Self {
        self.spec.interactive = Some(Interactive::Custom(Arc::new(prompt)));
        self
    }

    pub fn parser(mut self, parser: impl ValueParser + 'static) -> Self {
        self.spec.parser = Some(Arc::new(parser));
        self
    }

    pub fn validator(mut self, validator: impl ValueValidator + 'static) -> Self {
        self.spec.validator = Some(Arc::new(validator));
        self
    }

    pub fn build(self) -> ParameterSpec {
        self.spec
    }
}

#[derive(Default)]
pub struct SchemaBuilder {
    specs: Vec<ParameterSpec>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, spec: impl Into<ParameterSpec>) -> Self {
        self.specs.push(spec.into());
        self
    }

    pub fn try_build(self) -> Result<ParameterSchema> {
        ParameterSchema::new(self.specs)
    }

    /// Schemas are declared statically, so a bad declaration panics at first use.
    pub fn build(self) -> ParameterSchema {
        match self.try_build() {
            Ok(schema) => schema,
            Err(err) => panic!("invalid parameter schema: {err}"),
        }
    }
}

impl From<ParameterSpecBuilder> for ParameterSpec {
    fn from(builder: ParameterSpecBuilder) -> Self {
        builder.build()
    }
}
