use crate::imports::*;

use crate::console::render::Table;

/*
    Types:
    * HelloCommand - Greeting
    * HelpCommand - Table of every command with its usage
    * RootCommand - Main menu, enqueues the chosen command
    * ExitCommand - Ends the session, confirming first unless forced
    * MenuAction - One entry of a section menu (contacts, notes, storage)
*/

static NO_PARAMETERS: LazyLock<ParameterSchema> = LazyLock::new(ParameterSchema::empty);

static EXIT_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .param(
            ParameterSpecBuilder::new("force", ParamType::Bool)
                .prompt_text("Do you really want to exit?")
                .confirm("Exit", "Stay"),
        )
        .build()
});

#[derive(Debug, Clone, Copy)]
pub struct MenuAction {
    pub value: &'static str,
    pub label: &'static str,
    pub command: CommandName,
}

impl MenuAction {
    pub const fn new(value: &'static str, label: &'static str, command: CommandName) -> Self {
        Self {
            value,
            label,
            command,
        }
    }
}

/// Single optional `action` parameter chosen from `actions`.
pub(crate) fn action_schema(actions: &'static [MenuAction]) -> ParameterSchema {
    let names = actions
        .iter()
        .map(|action| action.value)
        .collect::<Vec<_>>()
        .join(" | ");
    SchemaBuilder::new()
        .param(
            ParameterSpecBuilder::text("action")
                .description("what to do")
                .format_hint(names)
                .parser(move |raw: &str| -> Result<ParamValue> {
                    let wanted = raw.trim().to_lowercase();
                    actions
                        .iter()
                        .find(|action| action.value == wanted)
                        .map(|action| ParamValue::from(action.value))
                        .ok_or_else(|| {
                            AssistantError::invalid_command(format!("unknown action '{}'", raw.trim()))
                        })
                })
                .select(
                    actions
                        .iter()
                        .map(|action| SelectOption::new(action.value, action.label))
                        .collect(),
                ),
        )
        .build()
}

/// Queue the command behind `chosen`. Scripts reaching a list get everything in
/// default order, since they cannot answer the list prompts.
pub(crate) fn run_action(
    ctx: &HandlerContext<'_>,
    actions: &[MenuAction],
    chosen: Option<&str>,
) -> Result<Outcome> {
    let Some(chosen) = chosen else {
        if !ctx.interactive() {
            let names = actions.iter().map(|action| action.value).collect::<Vec<_>>();
            return Err(AssistantError::invalid_command(format!(
                "choose an action: {}",
                names.join(", ")
            )));
        }
        render_canceled(ctx.console, "Nothing selected.");
        return Ok(Outcome::Continue);
    };
    let action = actions
        .iter()
        .find(|action| action.value == chosen)
        .ok_or_else(|| AssistantError::programming(format!("action '{chosen}' has no command")))?;

    let lists = matches!(action.command, CommandName::ContactsList | CommandName::NotesList);
    if lists && !ctx.interactive() {
        ctx.enqueue(action.command, ListRequest::all())?;
    } else {
        ctx.enqueue(action.command, ParameterValues::new())?;
    }
    Ok(Outcome::Continue)
}

pub struct HelloCommand;

impl Descriptor for HelloCommand {
    fn command_name() -> CommandName {
        CommandName::Hello
    }
    fn description() -> &'static str {
        "Say hello"
    }
    fn schema() -> &'static ParameterSchema {
        &NO_PARAMETERS
    }
}

impl FromParameters for HelloCommand {
    fn from_parameters(_: &ParameterValues) -> Result<Self> {
        Ok(Self)
    }
}

#[async_trait]
impl Executable for HelloCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        ctx.console
            .print(Tone::Good, "Hello, how can I assist you today?");
        Ok(Outcome::Continue)
    }
}

pub struct HelpCommand;

impl Descriptor for HelpCommand {
    fn command_name() -> CommandName {
        CommandName::Help
    }
    fn description() -> &'static str {
        "Show available commands"
    }
    fn schema() -> &'static ParameterSchema {
        &NO_PARAMETERS
    }
}

impl FromParameters for HelpCommand {
    fn from_parameters(_: &ParameterValues) -> Result<Self> {
        Ok(Self)
    }
}

#[async_trait]
impl Executable for HelpCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        let mut table = Table::new("Available commands", &["command", "description"]);
        for entry in ctx.registry.entries() {
            table.row(vec![entry.usage(), entry.description.to_string()]);
        }
        ctx.console.print(Tone::Plain, &table.render()?);
        ctx.console.print(
            Tone::Plain,
            "<arg> is required, [arg] is optional. Quote values with spaces, \"\" skips an argument.",
        );
        Ok(Outcome::Continue)
    }
}

pub struct RootCommand;

impl Descriptor for RootCommand {
    fn command_name() -> CommandName {
        CommandName::Root
    }
    fn description() -> &'static str {
        "Main menu"
    }
    fn schema() -> &'static ParameterSchema {
        &NO_PARAMETERS
    }
    fn hidden() -> bool {
        true
    }
}

impl FromParameters for RootCommand {
    fn from_parameters(_: &ParameterValues) -> Result<Self> {
        Ok(Self)
    }
}

#[async_trait]
impl Executable for RootCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        if !ctx.interactive() {
            return Err(AssistantError::invalid_command(
                "the main menu needs an interactive console, try `help`",
            ));
        }
        let options: Vec<SelectOption> = ctx
            .registry
            .menu_entries()
            .map(|entry| SelectOption::new(entry.name.as_str(), entry.description))
            .collect();
        match ctx.console.select("What would you like to do?", &options)? {
            Some(choice) => ctx.queue.put(QueueItem::raw(choice))?,
            None => render_canceled(ctx.console, "Nothing selected."),
        }
        Ok(Outcome::Continue)
    }
}

pub struct ExitCommand {
    force: Option<bool>,
}

impl Descriptor for ExitCommand {
    fn command_name() -> CommandName {
        CommandName::Exit
    }
    fn description() -> &'static str {
        "Save and leave the assistant"
    }
    fn schema() -> &'static ParameterSchema {
        &EXIT_SCHEMA
    }
}

impl FromParameters for ExitCommand {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            force: values.bool("force")?,
        })
    }
}

#[async_trait]
impl Executable for ExitCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        // Without an answer, a script means it; an interactive user skipped the dialog.
        let leave = self.force.unwrap_or(!ctx.interactive());
        if leave {
            ctx.console.print(Tone::Good, "Goodbye!");
            Ok(Outcome::Exit)
        } else {
            render_canceled(ctx.console, "Exit canceled.");
            Ok(Outcome::Continue)
        }
    }
}
