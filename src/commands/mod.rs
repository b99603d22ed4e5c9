use crate::imports::*;

pub mod contacts;
pub mod general;
pub mod notes;
pub mod records;
pub mod storage;
pub mod traits;

use std::fmt;
use std::str::FromStr;

/*
    Types:
    * CommandName - Closed set of command identifiers
    * Invocation - A command name with resolved parameters
    * HandlerContext - Everything a running handler can reach
    * CommandEntry - Registered command: metadata, schema and factory
    * CommandRegistry - Owns every command -> schema -> handler binding

    Handlers chain through the queue with a CommandName. They never call each other.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Hello,
    Help,
    Exit,
    Root,
    Contacts,
    ContactsList,
    ContactAdd,
    ContactView,
    ContactEdit,
    ContactDelete,
    ContactsBirthdays,
    ContactsExport,
    Notes,
    NotesList,
    NoteAdd,
    NoteView,
    NoteEdit,
    NoteDelete,
    Storage,
    StorageStats,
    StorageClear,
}

impl CommandName {
    pub const ALL: [CommandName; 21] = [
        Self::Hello,
        Self::Help,
        Self::Exit,
        Self::Root,
        Self::Contacts,
        Self::ContactsList,
        Self::ContactAdd,
        Self::ContactView,
        Self::ContactEdit,
        Self::ContactDelete,
        Self::ContactsBirthdays,
        Self::ContactsExport,
        Self::Notes,
        Self::NotesList,
        Self::NoteAdd,
        Self::NoteView,
        Self::NoteEdit,
        Self::NoteDelete,
        Self::Storage,
        Self::StorageStats,
        Self::StorageClear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hello => "hello",
            Self::Help => "help",
            Self::Exit => "exit",
            Self::Root => "root",
            Self::Contacts => "contacts",
            Self::ContactsList => "contacts_list",
            Self::ContactAdd => "contact_add",
            Self::ContactView => "contact_view",
            Self::ContactEdit => "contact_edit",
            Self::ContactDelete => "contact_delete",
            Self::ContactsBirthdays => "contacts_birthdays",
            Self::ContactsExport => "contacts_export",
            Self::Notes => "notes",
            Self::NotesList => "notes_list",
            Self::NoteAdd => "note_add",
            Self::NoteView => "note_view",
            Self::NoteEdit => "note_edit",
            Self::NoteDelete => "note_delete",
            Self::Storage => "storage",
            Self::StorageStats => "storage_stats",
            Self::StorageClear => "storage_clear",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandName {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let lowered = raw.trim().to_lowercase();
        match lowered.as_str() {
            "quit" | "close" => return Ok(Self::Exit),
            "hi" => return Ok(Self::Hello),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == lowered)
            .ok_or_else(|| AssistantError::invalid_command(format!("unknown command '{}'", raw.trim())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: CommandName,
    pub parameters: ParameterValues,
}

impl Invocation {
    pub fn new(command: CommandName, parameters: ParameterValues) -> Self {
        Self {
            command,
            parameters,
        }
    }

    /// Echo form shown when command echo is enabled.
    pub fn command_line(&self) -> String {
        let mut line = self.command.to_string();
        for (name, value) in self.parameters.iter() {
            line.push_str(&format!(" {name}='{value}'"));
        }
        line
    }
}

pub struct HandlerContext<'a> {
    pub store: &'a mut DataStore,
    pub console: &'a dyn Console,
    pub queue: QueueHandle,
    pub registry: &'a CommandRegistry,
    pub options: &'a SessionOptions,
}

impl HandlerContext<'_> {
    pub fn interactive(&self) -> bool {
        !self.options.non_interactive
    }

    pub fn enqueue(&self, command: CommandName, parameters: impl ToParameters) -> Result<()> {
        self.queue.put(QueueItem::typed(command, parameters))
    }
}

pub struct CommandEntry {
    pub name: CommandName,
    pub description: &'static str,
    pub hidden: bool,
    pub schema: &'static ParameterSchema,
    factory: CommandFactory,
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("hidden", &self.hidden)
            .field("params", &self.schema.len())
            .finish()
    }
}

impl CommandEntry {
    pub fn usage(&self) -> String {
        let args = self.schema.usage();
        if args.is_empty() {
            self.name.to_string()
        } else {
            format!("{} {args}", self.name)
        }
    }
}

#[derive(Debug)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    default_command: CommandName,
}

impl CommandRegistry {
    pub fn new(default_command: CommandName) -> Self {
        Self {
            entries: Vec::new(),
            default_command,
        }
    }

    /// Registry with every built-in command, in help display order.
    pub fn builtin(default_command: CommandName) -> Result<Self> {
        use self::contacts::*;
        use self::general::*;
        use self::notes::*;
        use self::records::*;
        use self::storage::*;

        let mut registry = Self::new(default_command);
        registry.register::<HelloCommand>()?;
        registry.register::<HelpCommand>()?;
        registry.register::<RootCommand>()?;
        registry.register::<ContactsCommand>()?;
        registry.register::<ListCommand<Contact>>()?;
        registry.register::<ContactAddCommand>()?;
        registry.register::<ViewCommand<Contact>>()?;
        registry.register::<ContactEditCommand>()?;
        registry.register::<DeleteCommand<Contact>>()?;
        registry.register::<BirthdaysCommand>()?;
        registry.register::<ExportCommand>()?;
        registry.register::<NotesCommand>()?;
        registry.register::<ListCommand<Note>>()?;
        registry.register::<NoteAddCommand>()?;
        registry.register::<ViewCommand<Note>>()?;
        registry.register::<NoteEditCommand>()?;
        registry.register::<DeleteCommand<Note>>()?;
        registry.register::<StorageCommand>()?;
        registry.register::<StorageStatsCommand>()?;
        registry.register::<StorageClearCommand>()?;
        registry.register::<ExitCommand>()?;

        registry.entry(default_command)?;
        Ok(registry)
    }

    pub fn register<T: Command>(&mut self) -> Result<()> {
        let name = T::command_name();
        if self.entries.iter().any(|entry| entry.name == name) {
            return Err(AssistantError::programming(format!(
                "command '{name}' is already registered"
            )));
        }
        tracing::debug!(command = %name, "Registering command");
        self.entries.push(CommandEntry {
            name,
            description: T::description(),
            hidden: T::hidden(),
            schema: T::schema(),
            factory: T::factory(),
        });
        Ok(())
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn menu_entries(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter().filter(|entry| !entry.hidden)
    }

    pub fn default_command(&self) -> CommandName {
        self.default_command
    }

    pub fn entry(&self, name: CommandName) -> Result<&CommandEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| AssistantError::programming(format!("command '{name}' is not registered")))
    }

    /// Turn a queue item into a validated invocation. Raw lines are tokenized and
    /// resolved; typed items go back through the same validation.
    #[tracing::instrument(skip(self, console), err)]
    pub fn prepare(
        &self,
        item: QueueItem,
        non_interactive: bool,
        console: &dyn Console,
    ) -> Result<Invocation> {
        match item {
            QueueItem::Raw(line) => {
                let parsed = parse_line(&line)?;
                let command = match parsed.command {
                    Some(word) => word.parse::<CommandName>()?,
                    None => self.default_command,
                };
                let entry = self.entry(command)?;
                let parameters = entry.schema.resolve(&parsed.args, non_interactive, console)?;
                Ok(Invocation::new(command, parameters))
            }
            QueueItem::Typed(invocation) => {
                let entry = self.entry(invocation.command)?;
                let parameters =
                    entry
                        .schema
                        .reresolve(&invocation.parameters, non_interactive, console)?;
                Ok(Invocation::new(invocation.command, parameters))
            }
        }
    }

    pub fn instantiate(&self, invocation: &Invocation) -> Result<Box<dyn Executable>> {
        let entry = self.entry(invocation.command)?;
        (entry.factory)(&invocation.parameters)
    }
}
