use crate::imports::*;

use std::marker::PhantomData;

use crate::console::render::render_card;
use crate::listing::schema::list_schema;
use crate::models::parse_uid_param;

/*
    Commands shared by every stored model: list, view, delete.

    Types:
    * FieldChange - What an edit does to one field: keep, clear, or set

    Traits:
    * RecordCommands - Binds a model to its command names and schemas
*/

/// Edit argument that empties an optional field.
pub const CLEAR_MARK: &str = "-";

pub trait RecordCommands: Record {
    const LIST: CommandName;
    const VIEW: CommandName;
    const EDIT: CommandName;
    const DELETE: CommandName;

    fn list_schema() -> &'static ParameterSchema;
    fn uid_schema() -> &'static ParameterSchema;
    fn delete_schema() -> &'static ParameterSchema;
}

pub(crate) fn uid_spec() -> ParameterSpecBuilder {
    ParameterSpecBuilder::text("uid")
        .required()
        .description("unique identifier")
        .parser(parse_uid_param)
        .interactive()
}

fn delete_schema_for<R: Record>() -> ParameterSchema {
    SchemaBuilder::new()
        .param(uid_spec())
        .param(
            ParameterSpecBuilder::new("force", ParamType::Bool)
                .required()
                .prompt_text(format!(
                    "Are you sure you want to delete this {}?",
                    R::SINGULAR
                ))
                .confirm("Delete", "Keep"),
        )
        .build()
}

static CONTACT_LIST_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(list_schema::<Contact>);
static NOTE_LIST_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(list_schema::<Note>);
static UID_SCHEMA: LazyLock<ParameterSchema> =
    LazyLock::new(|| SchemaBuilder::new().param(uid_spec()).build());
static CONTACT_DELETE_SCHEMA: LazyLock<ParameterSchema> =
    LazyLock::new(delete_schema_for::<Contact>);
static NOTE_DELETE_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(delete_schema_for::<Note>);

impl RecordCommands for Contact {
    const LIST: CommandName = CommandName::ContactsList;
    const VIEW: CommandName = CommandName::ContactView;
    const EDIT: CommandName = CommandName::ContactEdit;
    const DELETE: CommandName = CommandName::ContactDelete;

    fn list_schema() -> &'static ParameterSchema {
        &CONTACT_LIST_SCHEMA
    }
    fn uid_schema() -> &'static ParameterSchema {
        &UID_SCHEMA
    }
    fn delete_schema() -> &'static ParameterSchema {
        &CONTACT_DELETE_SCHEMA
    }
}

impl RecordCommands for Note {
    const LIST: CommandName = CommandName::NotesList;
    const VIEW: CommandName = CommandName::NoteView;
    const EDIT: CommandName = CommandName::NoteEdit;
    const DELETE: CommandName = CommandName::NoteDelete;

    fn list_schema() -> &'static ParameterSchema {
        &NOTE_LIST_SCHEMA
    }
    fn uid_schema() -> &'static ParameterSchema {
        &UID_SCHEMA
    }
    fn delete_schema() -> &'static ParameterSchema {
        &NOTE_DELETE_SCHEMA
    }
}

/// Parser for edit arguments: the clear mark stays text, anything else is coerced to `ty`.
pub(crate) fn clearable(ty: ParamType) -> impl Fn(&str) -> Result<ParamValue> + Send + Sync + 'static {
    move |raw: &str| {
        if raw.trim() == CLEAR_MARK {
            Ok(ParamValue::from(CLEAR_MARK))
        } else {
            ty.coerce(raw)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange<T> {
    Keep,
    Clear,
    Set(T),
}

impl<T> FieldChange<T> {
    pub fn read(
        values: &ParameterValues,
        name: &str,
        extract: impl FnOnce(&ParamValue) -> Option<T>,
    ) -> Result<Self> {
        match values.get(name) {
            None => Ok(Self::Keep),
            Some(ParamValue::Text(text)) if text == CLEAR_MARK => Ok(Self::Clear),
            Some(value) => extract(value).map(Self::Set).ok_or_else(|| {
                AssistantError::programming(format!("parameter `{name}` holds unexpected value {value:?}"))
            }),
        }
    }

    pub fn apply_option(self, slot: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Clear => *slot = None,
            Self::Set(value) => *slot = Some(value),
        }
    }
}

impl<T: Default> FieldChange<T> {
    pub fn apply(self, slot: &mut T) {
        match self {
            Self::Keep => {}
            Self::Clear => *slot = T::default(),
            Self::Set(value) => *slot = value,
        }
    }
}

/// Interactive edit: asks for every field the caller did not pass, prefilled with the
/// current value. Unchanged answers are left out so the field is kept.
pub(crate) fn prompt_missing(
    ctx: &HandlerContext<'_>,
    values: &mut ParameterValues,
    current: &[(&str, String)],
) -> Result<()> {
    if !ctx.interactive() {
        return Ok(());
    }
    for (name, shown) in current.iter() {
        if values.contains(name) {
            continue;
        }
        let message = format!("Enter {name} (\"{CLEAR_MARK}\" clears)");
        let answer = ctx.console.prompt_line(&message, Some(shown.as_str()))?;
        let answer = answer.trim();
        if answer != shown.as_str() {
            values.insert(*name, answer);
        }
    }
    Ok(())
}

fn uid_parameters(uid: Uuid) -> ParameterValues {
    params! { "uid" => uid }
}

pub struct ListCommand<R> {
    request: ListRequest,
    _model: PhantomData<fn() -> R>,
}

impl<R: RecordCommands> Descriptor for ListCommand<R> {
    fn command_name() -> CommandName {
        R::LIST
    }
    fn description() -> &'static str {
        "List, filter and sort records"
    }
    fn schema() -> &'static ParameterSchema {
        R::list_schema()
    }
    fn hidden() -> bool {
        true
    }
}

impl<R> FromParameters for ListCommand<R> {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            request: ListRequest::from_parameters(values)?,
            _model: PhantomData,
        })
    }
}

#[async_trait]
impl<R: RecordCommands> Executable for ListCommand<R> {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        // Modes are optional parameters; a script that leaves them out gets a clear message
        // here instead of reaching the engine without them.
        if self.request.filter_mode.is_none() || self.request.order_mode.is_none() {
            return Err(AssistantError::invalid_command(format!(
                "{} needs filter_mode and order_mode, e.g. `{} all \"\" default`",
                R::LIST,
                R::LIST
            )));
        }

        let items = apply(ctx.store.all::<R>(), &self.request)?;
        if items.is_empty() {
            render_canceled(ctx.console, &format!("No {} found.", R::PLURAL.to_lowercase()));
            return Ok(Outcome::Continue);
        }

        if ctx.options.plain_render {
            for item in &items {
                ctx.console.print(Tone::Plain, &item.uid().to_string());
            }
            return Ok(Outcome::Continue);
        }
        if !ctx.interactive() {
            for item in &items {
                ctx.console
                    .print(Tone::Plain, &format!("{}  {}", item.uid(), item.summary()));
            }
            return Ok(Outcome::Continue);
        }

        let options: Vec<SelectOption> = items
            .iter()
            .map(|item| SelectOption::new(item.uid().to_string(), item.summary()))
            .collect();
        let message = format!("{} ({} found), pick one to open", R::PLURAL, items.len());
        if let Some(choice) = ctx.console.select(&message, &options)? {
            let uid = parse_uid_param(&choice)?;
            ctx.enqueue(R::VIEW, params! { "uid" => uid })?;
        }
        Ok(Outcome::Continue)
    }
}

pub struct ViewCommand<R> {
    uid: Uuid,
    _model: PhantomData<fn() -> R>,
}

impl<R: RecordCommands> Descriptor for ViewCommand<R> {
    fn command_name() -> CommandName {
        R::VIEW
    }
    fn description() -> &'static str {
        "Show one record"
    }
    fn schema() -> &'static ParameterSchema {
        R::uid_schema()
    }
    fn hidden() -> bool {
        true
    }
}

impl<R> FromParameters for ViewCommand<R> {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            uid: values.required_uid("uid")?,
            _model: PhantomData,
        })
    }
}

#[async_trait]
impl<R: RecordCommands> Executable for ViewCommand<R> {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        let item = ctx.store.get::<R>(self.uid)?;
        ctx.console
            .print(Tone::Plain, &render_card(R::SINGULAR, &item.card())?);

        if !ctx.interactive() {
            return Ok(Outcome::Continue);
        }
        let options = [
            SelectOption::new("edit", "Edit"),
            SelectOption::new("delete", "Delete"),
            SelectOption::new("list", format!("Back to {}", R::PLURAL.to_lowercase())),
            SelectOption::new("menu", "Main menu"),
        ];
        match ctx
            .console
            .select("What next?", &options)?
            .as_deref()
        {
            Some("edit") => ctx.enqueue(R::EDIT, uid_parameters(self.uid))?,
            Some("delete") => ctx.enqueue(R::DELETE, uid_parameters(self.uid))?,
            Some("list") => ctx.enqueue(R::LIST, ParameterValues::new())?,
            Some("menu") => ctx.enqueue(CommandName::Root, ParameterValues::new())?,
            _ => {}
        }
        Ok(Outcome::Continue)
    }
}

pub struct DeleteCommand<R> {
    uid: Uuid,
    force: bool,
    _model: PhantomData<fn() -> R>,
}

impl<R: RecordCommands> Descriptor for DeleteCommand<R> {
    fn command_name() -> CommandName {
        R::DELETE
    }
    fn description() -> &'static str {
        "Delete one record"
    }
    fn schema() -> &'static ParameterSchema {
        R::delete_schema()
    }
    fn hidden() -> bool {
        true
    }
}

impl<R> FromParameters for DeleteCommand<R> {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            uid: values.required_uid("uid")?,
            force: values.bool("force")?.unwrap_or(false),
            _model: PhantomData,
        })
    }
}

#[async_trait]
impl<R: RecordCommands> Executable for DeleteCommand<R> {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        // Resolve before deciding, so an unknown uid is reported even when not forced.
        ctx.store.get::<R>(self.uid)?;
        if !self.force {
            render_canceled(ctx.console, "Deletion canceled.");
            return Ok(Outcome::Continue);
        }
        let removed = ctx.store.remove::<R>(self.uid)?;
        render_good(
            ctx.console,
            &format!("{} deleted: {}", R::SINGULAR, removed.summary()),
        );
        Ok(Outcome::Continue)
    }
}
