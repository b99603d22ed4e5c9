use crate::imports::*;

use crate::console::render::render_card;
use crate::validators::validate_tags;

use super::general::{MenuAction, action_schema, run_action};
use super::records::{FieldChange, clearable, prompt_missing, uid_spec};

/*
    Types:
    * NotesCommand - Notes section menu
    * NoteAddCommand - Create a note
    * NoteEditCommand - Change title, content or tags of a note
*/

static NOTE_ACTIONS: [MenuAction; 2] = [
    MenuAction::new("list", "List notes", CommandName::NotesList),
    MenuAction::new("add", "Add a note", CommandName::NoteAdd),
];

static NOTES_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| action_schema(&NOTE_ACTIONS));

static ADD_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .param(ParameterSpecBuilder::text("content").required().interactive())
        .param(ParameterSpecBuilder::text("title").interactive())
        .param(
            ParameterSpecBuilder::new("tags", ParamType::CommaList)
                .format_hint("comma separated")
                .validator(validate_tags)
                .interactive(),
        )
        .build()
});

static EDIT_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .param(uid_spec())
        .param(ParameterSpecBuilder::text("content"))
        .param(ParameterSpecBuilder::text("title").parser(clearable(ParamType::Text)))
        .param(
            ParameterSpecBuilder::new("tags", ParamType::CommaList)
                .parser(clearable(ParamType::CommaList))
                .validator(validate_tags),
        )
        .build()
});

pub struct NotesCommand {
    action: Option<String>,
}

impl Descriptor for NotesCommand {
    fn command_name() -> CommandName {
        CommandName::Notes
    }
    fn description() -> &'static str {
        "Notes menu"
    }
    fn schema() -> &'static ParameterSchema {
        &NOTES_SCHEMA
    }
}

impl FromParameters for NotesCommand {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            action: values.text("action")?.map(str::to_string),
        })
    }
}

#[async_trait]
impl Executable for NotesCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        run_action(ctx, &NOTE_ACTIONS, self.action.as_deref())
    }
}

pub struct NoteAddCommand {
    note: Note,
}

impl Descriptor for NoteAddCommand {
    fn command_name() -> CommandName {
        CommandName::NoteAdd
    }
    fn description() -> &'static str {
        "Add a note"
    }
    fn schema() -> &'static ParameterSchema {
        &ADD_SCHEMA
    }
    fn hidden() -> bool {
        true
    }
}

impl FromParameters for NoteAddCommand {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        let mut note = Note::new(values.required_text("content")?.trim());
        note.title = values.text("title")?.map(|title| title.trim().to_string());
        note.tags = values.list("tags")?;
        Ok(Self { note })
    }
}

#[async_trait]
impl Executable for NoteAddCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        if self.note.content.is_empty() {
            return Err(AssistantError::invalid_data("note content cannot be empty"));
        }
        ctx.store.insert(self.note.clone())?;
        render_good(
            ctx.console,
            &format!("Note added: {} ({})", self.note.heading(), self.note.uid),
        );
        Ok(Outcome::Continue)
    }
}

pub struct NoteEditCommand {
    uid: Uuid,
    values: ParameterValues,
}

impl Descriptor for NoteEditCommand {
    fn command_name() -> CommandName {
        CommandName::NoteEdit
    }
    fn description() -> &'static str {
        "Edit a note, \"-\" clears title or tags"
    }
    fn schema() -> &'static ParameterSchema {
        &EDIT_SCHEMA
    }
    fn hidden() -> bool {
        true
    }
}

impl FromParameters for NoteEditCommand {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            uid: values.required_uid("uid")?,
            values: values.clone(),
        })
    }
}

#[async_trait]
impl Executable for NoteEditCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        let mut note = ctx.store.get::<Note>(self.uid)?.clone();

        let mut values = self.values.clone();
        prompt_missing(
            ctx,
            &mut values,
            &[
                ("content", note.content.clone()),
                ("title", note.title.clone().unwrap_or_default()),
                ("tags", note.tags.join(",")),
            ],
        )?;
        let values = EDIT_SCHEMA.reresolve(&values, true, ctx.console)?;

        let text = |value: &ParamValue| match value {
            ParamValue::Text(text) => Some(text.trim().to_string()),
            _ => None,
        };
        match FieldChange::read(&values, "content", text)? {
            FieldChange::Set(content) if !content.is_empty() => note.content = content,
            FieldChange::Keep => {}
            _ => return Err(AssistantError::invalid_data("note content cannot be empty")),
        }
        FieldChange::read(&values, "title", text)?.apply_option(&mut note.title);
        FieldChange::read(&values, "tags", |value| match value {
            ParamValue::List(items) => Some(items.clone()),
            _ => None,
        })?
        .apply(&mut note.tags);

        ctx.store.update(note.clone())?;
        render_good(ctx.console, &format!("Note updated: {}", note.heading()));
        ctx.console
            .print(Tone::Plain, &render_card(Note::SINGULAR, &note.card())?);
        Ok(Outcome::Continue)
    }
}
