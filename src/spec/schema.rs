use crate::imports::*;

/*
    Types:
    * ParameterSchema - Ordered, validated list of ParameterSpec

    Construction enforces that every required parameter comes before every optional
    one, and that names are unique. Positional resolution relies on both.
*/

#[derive(Debug, Clone, Default)]
pub struct ParameterSchema {
    specs: Vec<ParameterSpec>,
}

impl ParameterSchema {
    pub fn new(specs: Vec<ParameterSpec>) -> Result<Self> {
        let mut seen_optional: Option<&str> = None;
        let mut names = HashSet::new();
        for spec in &specs {
            if !names.insert(spec.name.as_str()) {
                return Err(AssistantError::programming(format!(
                    "parameter `{}` is declared twice",
                    spec.name
                )));
            }
            match (spec.required, seen_optional) {
                (true, Some(optional)) => {
                    return Err(AssistantError::programming(format!(
                        "required parameter `{}` appears after optional parameter `{optional}`",
                        spec.name
                    )));
                }
                (false, None) => seen_optional = Some(spec.name.as_str()),
                _ => {}
            }
        }
        Ok(Self { specs })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn required_count(&self) -> usize {
        self.specs.iter().filter(|spec| spec.required).count()
    }

    pub fn usage(&self) -> String {
        self.specs
            .iter()
            .map(ParameterSpec::usage)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Resolve positional raw tokens against this schema.
    pub fn resolve(
        &self,
        tokens: &[String],
        non_interactive: bool,
        console: &dyn Console,
    ) -> Result<ParameterValues> {
        let args = tokens
            .iter()
            .map(|token| Some(RawArg::Text(token.clone())))
            .collect();
        crate::resolver::resolve_args(self, args, non_interactive, console)
    }

    /// Run already-typed values back through the same path `resolve` uses.
    pub fn reresolve(
        &self,
        existing: &ParameterValues,
        non_interactive: bool,
        console: &dyn Console,
    ) -> Result<ParameterValues> {
        let args = self
            .specs
            .iter()
            .map(|spec| existing.get(&spec.name).cloned().map(RawArg::Value))
            .collect();
        crate::resolver::resolve_args(self, args, non_interactive, console)
    }
}
