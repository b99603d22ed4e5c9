use crate::imports::*;

use crate::console::render::render_card;

use super::general::{MenuAction, action_schema, run_action};

/*
    Types:
    * StorageCommand - Storage section menu
    * StorageStatsCommand - Record counts and data file location
    * StorageClearCommand - Remove every contact and note
*/

static STORAGE_ACTIONS: [MenuAction; 2] = [
    MenuAction::new("stats", "Show storage statistics", CommandName::StorageStats),
    MenuAction::new("clear", "Delete all data", CommandName::StorageClear),
];

static STORAGE_SCHEMA: LazyLock<ParameterSchema> =
    LazyLock::new(|| action_schema(&STORAGE_ACTIONS));

static STATS_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(ParameterSchema::empty);

static CLEAR_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .param(
            ParameterSpecBuilder::new("force", ParamType::Bool)
                .prompt_text("Delete all contacts and notes?")
                .confirm("Delete everything", "Keep"),
        )
        .build()
});

pub struct StorageCommand {
    action: Option<String>,
}

impl Descriptor for StorageCommand {
    fn command_name() -> CommandName {
        CommandName::Storage
    }
    fn description() -> &'static str {
        "Storage menu"
    }
    fn schema() -> &'static ParameterSchema {
        &STORAGE_SCHEMA
    }
}

impl FromParameters for StorageCommand {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            action: values.text("action")?.map(str::to_string),
        })
    }
}

#[async_trait]
impl Executable for StorageCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        run_action(ctx, &STORAGE_ACTIONS, self.action.as_deref())
    }
}

pub struct StorageStatsCommand;

impl Descriptor for StorageStatsCommand {
    fn command_name() -> CommandName {
        CommandName::StorageStats
    }
    fn description() -> &'static str {
        "Show how much is stored and where"
    }
    fn schema() -> &'static ParameterSchema {
        &STATS_SCHEMA
    }
    fn hidden() -> bool {
        true
    }
}

impl FromParameters for StorageStatsCommand {
    fn from_parameters(_: &ParameterValues) -> Result<Self> {
        Ok(Self)
    }
}

#[async_trait]
impl Executable for StorageStatsCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        ctx.console.print(Tone::Plain, &stats_card(ctx.store)?);
        Ok(Outcome::Continue)
    }
}

pub(crate) fn stats_card(store: &DataStore) -> Result<String> {
    let rows = [
        CardRow::new(Contact::PLURAL, store.len::<Contact>().to_string()),
        CardRow::new(Note::PLURAL, store.len::<Note>().to_string()),
        CardRow::new("Data file", store.path().display().to_string()),
        CardRow::new("Unsaved changes", if store.is_dirty() { "yes" } else { "no" }),
    ];
    render_card("Storage", &rows)
}

pub struct StorageClearCommand {
    force: Option<bool>,
}

impl Descriptor for StorageClearCommand {
    fn command_name() -> CommandName {
        CommandName::StorageClear
    }
    fn description() -> &'static str {
        "Delete every contact and note"
    }
    fn schema() -> &'static ParameterSchema {
        &CLEAR_SCHEMA
    }
    fn hidden() -> bool {
        true
    }
}

impl FromParameters for StorageClearCommand {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            force: values.bool("force")?,
        })
    }
}

#[async_trait]
impl Executable for StorageClearCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        if !self.force.unwrap_or(!ctx.interactive()) {
            render_canceled(ctx.console, "Nothing was deleted.");
            return Ok(Outcome::Continue);
        }
        let contacts = ctx.store.len::<Contact>();
        let notes = ctx.store.len::<Note>();
        ctx.store.clear();
        tracing::debug!(contacts, notes, "Storage cleared");
        render_good(
            ctx.console,
            &format!("Deleted {contacts} contacts and {notes} notes."),
        );
        Ok(Outcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::scripted::{Answer, ScriptedConsole};
    use crate::session::testing::Harness;

    #[tokio::test]
    async fn test_stats_card() {
        init_tracing();
        let mut harness = Harness::non_interactive(ScriptedConsole::new());
        harness.store_mut().insert(Contact::new("Anna")).unwrap();
        harness.run_line("storage_stats").await.unwrap();

        let output = harness.console().output();
        assert!(output.contains("== Storage =="));
        assert!(output.contains("Contacts"));
        assert!(output.contains("data.json"));
    }

    #[tokio::test]
    async fn test_clear_asks_when_interactive() {
        let mut harness = Harness::interactive(ScriptedConsole::with_answers([Answer::Bool(None)]));
        harness.store_mut().insert(Note::new("keep me")).unwrap();

        harness.run_line("storage_clear").await.unwrap();
        assert_eq!(harness.store().len::<Note>(), 1);
        assert_eq!(harness.console().prompts(), vec!["Delete all contacts and notes?"]);

        harness.run_line("storage_clear true").await.unwrap();
        assert_eq!(harness.store().len::<Note>(), 0);
    }

    #[tokio::test]
    async fn test_menu_reaches_stats() {
        let mut harness = Harness::non_interactive(ScriptedConsole::new());
        harness.run_line("storage stats").await.unwrap();
        assert_eq!(
            harness.next_queued(),
            Some(QueueItem::typed(CommandName::StorageStats, ParameterValues::new()))
        );
    }
}
