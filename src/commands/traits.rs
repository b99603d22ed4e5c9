use crate::imports::*;

/*
    Types:
    * CommandFactory - Builds an executable command from resolved parameters
    * Outcome - What the session loop does after a command finished

    Traits:
    * Command - Marker trait for commands implementing FromParameters, Descriptor, and Executable
    * Descriptor - Static metadata: name, description, parameter schema
    * Executable - Async trait for running a command against the handler context
*/
pub type CommandFactory =
    Box<dyn Fn(&ParameterValues) -> Result<Box<dyn Executable>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

pub trait Command: FromParameters + Descriptor + Executable {
    fn factory() -> CommandFactory
    where
        Self: Sized,
    {
        Box::new(|values: &ParameterValues| -> Result<Box<dyn Executable>> {
            let instance = Self::from_parameters(values)?;
            Ok(Box::new(instance) as Box<dyn Executable>)
        })
    }
}
// Blanket implementation for any type that implements the required traits
impl<T: FromParameters + Descriptor + Executable> Command for T {}

pub trait Descriptor: Sized {
    fn command_name() -> CommandName;
    fn description() -> &'static str;
    fn schema() -> &'static ParameterSchema;
    /// Hidden commands stay callable but are left out of the main menu.
    fn hidden() -> bool {
        false
    }
}

#[async_trait]
pub trait Executable: Send + Sync + 'static {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome>;
}
