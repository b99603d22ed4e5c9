use crate::imports::*;

use crate::console::render::render_intro;

/*
    Types:
    * ChatSession - Main loop: reads input, drains the dispatch queue, runs handlers

    The session is the only error boundary. Recoverable errors are rendered and the loop
    moves on; programming errors end the run. Storage is committed after every handler
    that returned Ok.
*/

const INPUT_PROMPT: &str = "Command";

pub struct ChatSession<C: Console> {
    registry: CommandRegistry,
    queue: DispatchQueue,
    store: DataStore,
    console: C,
    options: SessionOptions,
}

impl<C: Console> ChatSession<C> {
    pub fn new(
        registry: CommandRegistry,
        store: DataStore,
        console: C,
        options: SessionOptions,
    ) -> Self {
        Self {
            registry,
            queue: DispatchQueue::new(),
            store,
            console,
            options,
        }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Run until `exit`, end of input, or, in non-interactive mode, until the first
    /// input line and everything it queued are done.
    #[tracing::instrument(skip_all, err, fields(non_interactive = self.options.non_interactive))]
    pub async fn run(&mut self, predefined_input: Option<String>) -> Result<()> {
        let interactive = !self.options.non_interactive;
        if !self.options.hide_intro {
            let default_command = interactive.then(|| self.registry.default_command().as_str());
            self.console
                .print(Tone::Heading, &render_intro(default_command)?);
        }

        let mut pending = predefined_input;
        let mut consumed_input = false;
        loop {
            if self.queue.is_empty() {
                if !interactive && consumed_input {
                    break;
                }
                let line = match pending.take() {
                    Some(line) => line,
                    None => match self.console.prompt_line(INPUT_PROMPT, None) {
                        Ok(line) => line,
                        Err(err) if is_input_closed(&err) => {
                            tracing::info!("Input closed, ending session");
                            break;
                        }
                        Err(err) => return Err(err),
                    },
                };
                consumed_input = true;
                self.queue.put(QueueItem::raw(line))?;
            }

            let item = self.queue.get().await?;
            if self.process(item).await? == Outcome::Exit {
                break;
            }
        }

        self.store.commit().await
    }

    /// One queue item behind the error boundary.
    async fn process(&mut self, item: QueueItem) -> Result<Outcome> {
        let outcome = match self.dispatch(item).await {
            Ok(outcome) => outcome,
            Err(err) => return self.recover(err),
        };
        match self.store.commit().await {
            Ok(()) => Ok(outcome),
            Err(err) => self.recover(err).map(|_| outcome),
        }
    }

    fn recover(&self, err: anyhow::Error) -> Result<Outcome> {
        match AssistantError::find(&err) {
            Some(kind) if kind.is_recoverable() => {
                tracing::debug!(error = %err, title = kind.title(), "Command rejected");
                render_error(&self.console, kind.title(), &format!("{err:#}"));
                Ok(Outcome::Continue)
            }
            Some(AssistantError::InputClosed) => {
                tracing::info!("Input closed while a command was running");
                Ok(Outcome::Exit)
            }
            Some(_) => Err(err),
            None => {
                tracing::warn!(error = ?err, "Command failed");
                render_error(&self.console, "Error", &format!("{err:#}"));
                Ok(Outcome::Continue)
            }
        }
    }

    #[tracing::instrument(skip(self), err)]
    pub(crate) async fn dispatch(&mut self, item: QueueItem) -> Result<Outcome> {
        let invocation = self
            .registry
            .prepare(item, self.options.non_interactive, &self.console)?;
        if self.options.show_commands {
            self.console
                .print(Tone::Plain, &format!("> {}", invocation.command_line()));
        }
        let command = self.registry.instantiate(&invocation)?;

        let mut ctx = HandlerContext {
            store: &mut self.store,
            console: &self.console,
            queue: self.queue.handle(),
            registry: &self.registry,
            options: &self.options,
        };
        tracing::debug!(command = %invocation.command, "Executing");
        command.execute(&mut ctx).await
    }
}

fn is_input_closed(err: &anyhow::Error) -> bool {
    matches!(AssistantError::find(err), Some(AssistantError::InputClosed))
}


#[cfg(test)]
mod tests {
    use super::testing::Harness;
    use super::*;
    use crate::console::scripted::{Answer, ScriptedConsole};
    use crate::storage::DATA_FILE;

    struct BrokenCommand;

    static BROKEN_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(ParameterSchema::empty);

    impl Descriptor for BrokenCommand {
        fn command_name() -> CommandName {
            CommandName::Hello
        }
        fn description() -> &'static str {
            "Always fails with a programming error"
        }
        fn schema() -> &'static ParameterSchema {
            &BROKEN_SCHEMA
        }
    }

    impl FromParameters for BrokenCommand {
        fn from_parameters(_: &ParameterValues) -> Result<Self> {
            Ok(Self)
        }
    }

    #[async_trait]
    impl Executable for BrokenCommand {
        async fn execute(&self, _: &mut HandlerContext<'_>) -> Result<Outcome> {
            Err(AssistantError::programming("handler bug"))
        }
    }

    #[tokio::test]
    async fn test_script_drains_follow_ups() {
        init_tracing();
        let mut harness = Harness::non_interactive(ScriptedConsole::new());
        harness
            .session_mut()
            .run(Some("contacts list".to_string()))
            .await
            .unwrap();
        // `contacts` queued `contacts_list`, which ran before the session ended.
        assert!(harness.console().output().contains("No contacts found."));
        assert!(harness.next_queued().is_none());
    }

    #[tokio::test]
    async fn test_follow_ups_queue_behind_waiting_items() {
        let mut harness = Harness::non_interactive(ScriptedConsole::new()).echo_commands();
        harness.queue_line("contacts list");
        harness.queue_line("hello");
        harness.queue_line("note_add memo");
        harness.session_mut().run(None).await.unwrap();

        let dispatched: Vec<String> = harness
            .console()
            .output_with(Tone::Plain)
            .iter()
            .filter_map(|line| line.strip_prefix("> "))
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect();
        // `contacts` queued its list behind the two lines that were already waiting.
        assert_eq!(dispatched, vec!["contacts", "hello", "note_add", "contacts_list"]);
        assert_eq!(harness.store().len::<Note>(), 1);
    }

    #[tokio::test]
    async fn test_recoverable_errors_are_rendered() {
        let mut harness = Harness::non_interactive(ScriptedConsole::new());
        harness
            .session_mut()
            .run(Some("fly away".to_string()))
            .await
            .unwrap();
        assert_eq!(
            harness.console().output_with(Tone::Bad),
            vec!["Invalid Command: unknown command 'fly'"]
        );
    }

    #[tokio::test]
    async fn test_programming_errors_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = CommandRegistry::new(CommandName::Hello);
        registry.register::<BrokenCommand>().unwrap();
        let options = SessionOptions {
            non_interactive: true,
            hide_intro: true,
            ..SessionOptions::default()
        };
        let mut session = ChatSession::new(
            registry,
            DataStore::empty(dir.path()),
            ScriptedConsole::new(),
            options,
        );

        let err = session.run(Some("hello".to_string())).await.unwrap_err();
        assert_eq!(AssistantError::find(&err).unwrap().title(), "Programming Error");
    }

    #[tokio::test]
    async fn test_commit_follows_success_only() {
        let mut harness = Harness::non_interactive(ScriptedConsole::new());
        let data_file = harness.data_dir().join(DATA_FILE);

        harness
            .session_mut()
            .run(Some("contact_add Anna \"\" \"\" 12".to_string()))
            .await
            .unwrap();
        assert!(!data_file.exists());

        harness
            .session_mut()
            .run(Some("contact_add Anna".to_string()))
            .await
            .unwrap();
        let saved = std::fs::read_to_string(&data_file).unwrap();
        assert!(saved.contains("\"name\": \"Anna\""));
    }

    #[tokio::test]
    async fn test_interactive_session_until_input_ends() {
        let console = ScriptedConsole::with_answers([Answer::Line("hi".to_string())]);
        let mut harness = Harness::interactive(console);
        harness.session_mut().run(None).await.unwrap();

        assert!(harness.console().output().contains("Hello, how can I assist you today?"));
        assert_eq!(harness.console().prompts(), vec![INPUT_PROMPT, INPUT_PROMPT]);
    }

    #[tokio::test]
    async fn test_exit_stops_before_reading_more() {
        let console = ScriptedConsole::with_answers([
            Answer::Line("exit yes".to_string()),
            Answer::Line("hello".to_string()),
        ]);
        let mut harness = Harness::interactive(console);
        harness.session_mut().run(None).await.unwrap();

        assert_eq!(harness.console().remaining_answers(), 1);
        assert!(harness.console().output().contains("Goodbye!"));
    }
}
