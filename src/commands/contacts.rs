use crate::imports::*;

use crate::console::render::{Table, render_card};
use crate::spec::DATE_FORMAT;
use crate::validators::{today, validate_birthday, validate_emails, validate_phones};

use super::general::{MenuAction, action_schema, run_action};
use super::records::{FieldChange, clearable, prompt_missing, uid_spec};

/*
    Types:
    * ContactsCommand - Contacts section menu
    * ContactAddCommand - Create a contact
    * ContactEditCommand - Change fields of an existing contact
    * BirthdaysCommand - Upcoming birthdays within a window of days
    * ExportCommand - Write every contact to a CSV or JSON file
*/

const MAX_BIRTHDAY_WINDOW: i64 = 365;
const EXPORT_STEM: &str = "contacts";

static CONTACT_ACTIONS: [MenuAction; 4] = [
    MenuAction::new("list", "List contacts", CommandName::ContactsList),
    MenuAction::new("add", "Add a contact", CommandName::ContactAdd),
    MenuAction::new("birthdays", "Upcoming birthdays", CommandName::ContactsBirthdays),
    MenuAction::new("export", "Export contacts", CommandName::ContactsExport),
];

static CONTACTS_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| action_schema(&CONTACT_ACTIONS));

static ADD_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .param(
            ParameterSpecBuilder::text("name")
                .required()
                .description("full name")
                .interactive(),
        )
        .param(ParameterSpecBuilder::text("address").interactive())
        .param(
            ParameterSpecBuilder::new("birthday", ParamType::Date)
                .format_hint("YYYY-MM-DD")
                .validator(validate_birthday)
                .interactive(),
        )
        .param(
            ParameterSpecBuilder::new("phones", ParamType::CommaList)
                .format_hint("comma separated")
                .validator(validate_phones)
                .interactive(),
        )
        .param(
            ParameterSpecBuilder::new("emails", ParamType::CommaList)
                .format_hint("comma separated")
                .validator(validate_emails)
                .interactive(),
        )
        .build()
});

static EDIT_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .param(uid_spec())
        .param(ParameterSpecBuilder::text("name"))
        .param(ParameterSpecBuilder::text("address").parser(clearable(ParamType::Text)))
        .param(
            ParameterSpecBuilder::new("birthday", ParamType::Date)
                .format_hint("YYYY-MM-DD")
                .parser(clearable(ParamType::Date))
                .validator(validate_birthday),
        )
        .param(
            ParameterSpecBuilder::new("phones", ParamType::CommaList)
                .parser(clearable(ParamType::CommaList))
                .validator(validate_phones),
        )
        .param(
            ParameterSpecBuilder::new("emails", ParamType::CommaList)
                .parser(clearable(ParamType::CommaList))
                .validator(validate_emails),
        )
        .build()
});

static BIRTHDAYS_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .param(
            ParameterSpecBuilder::new("days", ParamType::Int)
                .description("how many days ahead")
                .default_value(7i64)
                .validator(|value: ParamValue| -> Result<ParamValue> {
                    match value {
                        ParamValue::Int(days) if !(1..=MAX_BIRTHDAY_WINDOW).contains(&days) => {
                            Err(AssistantError::invalid_data(format!(
                                "days must be between 1 and {MAX_BIRTHDAY_WINDOW}, got {days}"
                            )))
                        }
                        other => Ok(other),
                    }
                }),
        )
        .build()
});

static EXPORT_SCHEMA: LazyLock<ParameterSchema> = LazyLock::new(|| {
    SchemaBuilder::new()
        .param(
            ParameterSpecBuilder::text("format")
                .format_hint("csv | json")
                .parser(|raw: &str| -> Result<ParamValue> {
                    let format: ExportFormat = raw.parse()?;
                    Ok(ParamValue::from(format.extension()))
                })
                .select(vec![
                    SelectOption::new("csv", "CSV table"),
                    SelectOption::new("json", "JSON document"),
                ]),
        )
        .build()
});

pub struct ContactsCommand {
    action: Option<String>,
}

impl Descriptor for ContactsCommand {
    fn command_name() -> CommandName {
        CommandName::Contacts
    }
    fn description() -> &'static str {
        "Contacts menu"
    }
    fn schema() -> &'static ParameterSchema {
        &CONTACTS_SCHEMA
    }
}

impl FromParameters for ContactsCommand {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            action: values.text("action")?.map(str::to_string),
        })
    }
}

#[async_trait]
impl Executable for ContactsCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        run_action(ctx, &CONTACT_ACTIONS, self.action.as_deref())
    }
}

pub struct ContactAddCommand {
    contact: Contact,
}

impl Descriptor for ContactAddCommand {
    fn command_name() -> CommandName {
        CommandName::ContactAdd
    }
    fn description() -> &'static str {
        "Add a contact"
    }
    fn schema() -> &'static ParameterSchema {
        &ADD_SCHEMA
    }
    fn hidden() -> bool {
        true
    }
}

impl FromParameters for ContactAddCommand {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        let mut contact = Contact::new(values.required_text("name")?.trim());
        contact.address = values.text("address")?.map(str::to_string);
        contact.birthday = values.date("birthday")?;
        contact.phones = values.list("phones")?;
        contact.emails = values.list("emails")?;
        Ok(Self { contact })
    }
}

#[async_trait]
impl Executable for ContactAddCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        if self.contact.name.is_empty() {
            return Err(AssistantError::invalid_data("contact name cannot be empty"));
        }
        ctx.store.insert(self.contact.clone())?;
        tracing::debug!(uid = %self.contact.uid, "Contact added");
        render_good(
            ctx.console,
            &format!("Contact added: {} ({})", self.contact.name, self.contact.uid),
        );
        Ok(Outcome::Continue)
    }
}

pub struct ContactEditCommand {
    uid: Uuid,
    values: ParameterValues,
}

impl Descriptor for ContactEditCommand {
    fn command_name() -> CommandName {
        CommandName::ContactEdit
    }
    fn description() -> &'static str {
        "Edit a contact, \"-\" clears a field"
    }
    fn schema() -> &'static ParameterSchema {
        &EDIT_SCHEMA
    }
    fn hidden() -> bool {
        true
    }
}

impl FromParameters for ContactEditCommand {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            uid: values.required_uid("uid")?,
            values: values.clone(),
        })
    }
}

fn text_of(value: &ParamValue) -> Option<String> {
    match value {
        ParamValue::Text(text) => Some(text.trim().to_string()),
        _ => None,
    }
}

fn list_of(value: &ParamValue) -> Option<Vec<String>> {
    match value {
        ParamValue::List(items) => Some(items.clone()),
        _ => None,
    }
}

#[async_trait]
impl Executable for ContactEditCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        let mut contact = ctx.store.get::<Contact>(self.uid)?.clone();

        let mut values = self.values.clone();
        prompt_missing(
            ctx,
            &mut values,
            &[
                ("name", contact.name.clone()),
                ("address", contact.address.clone().unwrap_or_default()),
                (
                    "birthday",
                    contact
                        .birthday
                        .map(|date| date.format(DATE_FORMAT).to_string())
                        .unwrap_or_default(),
                ),
                ("phones", contact.phones.join(",")),
                ("emails", contact.emails.join(",")),
            ],
        )?;
        // Prompted answers are still raw text; run them through the same checks as arguments.
        let values = EDIT_SCHEMA.reresolve(&values, true, ctx.console)?;

        match FieldChange::read(&values, "name", text_of)? {
            FieldChange::Set(name) if !name.is_empty() => contact.name = name,
            FieldChange::Keep => {}
            _ => return Err(AssistantError::invalid_data("contact name cannot be empty")),
        }
        FieldChange::read(&values, "address", text_of)?.apply_option(&mut contact.address);
        FieldChange::read(&values, "birthday", |value| match value {
            ParamValue::Date(date) => Some(*date),
            _ => None,
        })?
        .apply_option(&mut contact.birthday);
        FieldChange::read(&values, "phones", list_of)?.apply(&mut contact.phones);
        FieldChange::read(&values, "emails", list_of)?.apply(&mut contact.emails);

        ctx.store.update(contact.clone())?;
        render_good(ctx.console, &format!("Contact updated: {}", contact.name));
        ctx.console
            .print(Tone::Plain, &render_card(Contact::SINGULAR, &contact.card())?);
        Ok(Outcome::Continue)
    }
}

pub struct BirthdaysCommand {
    days: i64,
}

impl Descriptor for BirthdaysCommand {
    fn command_name() -> CommandName {
        CommandName::ContactsBirthdays
    }
    fn description() -> &'static str {
        "Show birthdays coming up in the next days"
    }
    fn schema() -> &'static ParameterSchema {
        &BIRTHDAYS_SCHEMA
    }
    fn hidden() -> bool {
        true
    }
}

impl FromParameters for BirthdaysCommand {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            days: values.int("days")?.unwrap_or(7),
        })
    }
}

#[async_trait]
impl Executable for BirthdaysCommand {
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        let today = today();
        let mut upcoming: Vec<_> = ctx
            .store
            .all::<Contact>()
            .iter()
            .filter_map(|contact| contact.upcoming_birthday(today, self.days))
            .collect();
        if upcoming.is_empty() {
            render_canceled(
                ctx.console,
                &format!("No birthdays in the next {} days.", self.days),
            );
            return Ok(Outcome::Continue);
        }
        upcoming.sort_by(|a, b| {
            a.congratulate_on
                .cmp(&b.congratulate_on)
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut table = Table::new(
            format!("Birthdays in the next {} days", self.days),
            &["name", "birthday", "congratulate on", "turns"],
        );
        for entry in &upcoming {
            table.row(vec![
                entry.name.clone(),
                entry.birthday.format(DATE_FORMAT).to_string(),
                entry.congratulate_on.format("%A, %Y-%m-%d").to_string(),
                entry.turns.to_string(),
            ]);
        }
        ctx.console.print(Tone::Plain, &table.render()?);
        Ok(Outcome::Continue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    fn encode(&self, contacts: &[Contact]) -> Result<Vec<u8>> {
        match self {
            Self::Csv => encode_csv(contacts),
            Self::Json => serde_json::to_vec_pretty(contacts).context("failed to encode contacts"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(AssistantError::invalid_command(format!(
                "unknown export format '{other}', expected 'csv' or 'json'"
            ))),
        }
    }
}

fn encode_csv(contacts: &[Contact]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["uid", "name", "address", "birthday", "phones", "emails"])?;
    for contact in contacts {
        writer.write_record([
            contact.uid.to_string(),
            contact.name.clone(),
            contact.address.clone().unwrap_or_default(),
            contact
                .birthday
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            contact.phones.join(";"),
            contact.emails.join(";"),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("failed to finish csv export: {}", err.error()))
}

pub struct ExportCommand {
    format: Option<ExportFormat>,
}

impl Descriptor for ExportCommand {
    fn command_name() -> CommandName {
        CommandName::ContactsExport
    }
    fn description() -> &'static str {
        "Export contacts to the export directory"
    }
    fn schema() -> &'static ParameterSchema {
        &EXPORT_SCHEMA
    }
    fn hidden() -> bool {
        true
    }
}

impl FromParameters for ExportCommand {
    fn from_parameters(values: &ParameterValues) -> Result<Self> {
        Ok(Self {
            format: values.text("format")?.map(str::parse).transpose()?,
        })
    }
}

#[async_trait]
impl Executable for ExportCommand {
    #[tracing::instrument(skip_all, err, fields(format = ?self.format))]
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<Outcome> {
        let contacts = ctx.store.all::<Contact>();
        if contacts.is_empty() {
            return Err(AssistantError::not_found("there are no contacts to export"));
        }
        let format = self.format.unwrap_or(ExportFormat::Csv);
        let target = ctx
            .options
            .export_dir
            .join(format!("{EXPORT_STEM}.{}", format.extension()));

        if ctx.interactive() && tokio::fs::try_exists(&target).await.unwrap_or(false) {
            let message = format!("{} already exists. Overwrite?", target.display());
            if ctx.console.prompt_bool(&message, "Overwrite", "Keep", true)? != Some(true) {
                render_canceled(ctx.console, "Export canceled.");
                return Ok(Outcome::Continue);
            }
        }

        let encoded = format.encode(contacts)?;
        tokio::fs::create_dir_all(&ctx.options.export_dir)
            .await
            .with_context(|| format!("failed to create {}", ctx.options.export_dir.display()))?;
        tokio::fs::write(&target, encoded)
            .await
            .with_context(|| format!("failed to write {}", target.display()))?;

        tracing::debug!(path = %target.display(), count = contacts.len(), "Contacts exported");
        render_good(
            ctx.console,
            &format!("Exported {} contacts to {}", contacts.len(), target.display()),
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
    async fn test_add_from_arguments() {
        init_tracing();
        let mut harness = Harness::non_interactive(ScriptedConsole::new());
        harness
            .run_line("contact_add \"Anna Smith\" Kyiv 1990-05-17 \"+38 (050) 123-45-67\" ANNA@Example.COM")
            .await
            .unwrap();

        let contact = &harness.store().all::<Contact>()[0];
        assert_eq!(contact.name, "Anna Smith");
        assert_eq!(contact.address.as_deref(), Some("Kyiv"));
        assert_eq!(contact.birthday, NaiveDate::from_ymd_opt(1990, 5, 17));
        assert_eq!(contact.phones, vec!["+380501234567"]);
        assert_eq!(contact.emails, vec!["ANNA@example.com"]);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_phone() {
        let mut harness = Harness::non_interactive(ScriptedConsole::new());
        let err = harness.run_line("contact_add Anna \"\" \"\" 12").await.unwrap_err();
        assert_eq!(AssistantError::find(&err).unwrap().title(), "Invalid Data");
        assert_eq!(harness.store().len::<Contact>(), 0);
    }

    #[tokio::test]
    async fn test_add_prompts_for_everything_interactively() {
        let console = ScriptedConsole::new()
            .line("Bob")
            .line("")
            .line("")
            .line("0501234567")
            .line("");
        let mut harness = Harness::interactive(console);
        harness.run_line("contact_add").await.unwrap();

        assert_eq!(harness.console().prompt_count(), 5);
        let contact = &harness.store().all::<Contact>()[0];
        assert_eq!(contact.name, "Bob");
        assert_eq!(contact.address, None);
        assert_eq!(contact.phones, vec!["0501234567"]);
    }

    #[tokio::test]
    async fn test_edit_sets_and_clears() {
        let mut harness = Harness::non_interactive(ScriptedConsole::new());
        let mut contact = Contact::new("Anna");
        contact.address = Some("Kyiv".to_string());
        contact.phones = vec!["0501234567".to_string()];
        let uid = contact.uid;
        harness.store_mut().insert(contact).unwrap();

        harness
            .run_line(&format!("contact_edit {uid} \"Anna K\" - \"\" -"))
            .await
            .unwrap();
        let edited = harness.store().get::<Contact>(uid).unwrap();
        assert_eq!(edited.name, "Anna K");
        assert_eq!(edited.address, None);
        assert!(edited.phones.is_empty());
    }

    #[tokio::test]
    async fn test_edit_prompts_with_current_values() {
        let mut harness = Harness::interactive(ScriptedConsole::new());
        let contact = Contact::new("Anna");
        let uid = contact.uid;
        harness.store_mut().insert(contact).unwrap();
        harness.console().push_answers([
            Answer::Line(String::new()),
            Answer::Line("Lviv".to_string()),
            Answer::Line(String::new()),
            Answer::Line(String::new()),
            Answer::Line("anna@example.com".to_string()),
        ]);

        harness.run_line(&format!("contact_edit {uid}")).await.unwrap();
        let edited = harness.store().get::<Contact>(uid).unwrap();
        assert_eq!(edited.name, "Anna");
        assert_eq!(edited.address.as_deref(), Some("Lviv"));
        assert_eq!(edited.emails, vec!["anna@example.com"]);
    }

    #[tokio::test]
    async fn test_edit_refuses_empty_name() {
        let mut harness = Harness::non_interactive(ScriptedConsole::new());
        let contact = Contact::new("Anna");
        let uid = contact.uid;
        harness.store_mut().insert(contact).unwrap();

        let err = harness.run_line(&format!("contact_edit {uid} -")).await.unwrap_err();
        assert_eq!(AssistantError::find(&err).unwrap().title(), "Invalid Data");
    }

    #[tokio::test]
    async fn test_birthdays_window_is_checked() {
        let mut harness = Harness::non_interactive(ScriptedConsole::new());
        let err = harness.run_line("contacts_birthdays 0").await.unwrap_err();
        assert!(err.to_string().contains("between 1 and 365"));

        harness.run_line("contacts_birthdays").await.unwrap();
        assert!(harness.console().output().contains("No birthdays in the next 7 days."));
    }

    #[tokio::test]
    async fn test_birthdays_lists_upcoming() {
        let mut harness = Harness::non_interactive(ScriptedConsole::new());
        let mut contact = Contact::new("Anna");
        contact.birthday = Some(today() - chrono::Duration::days(365 * 30));
        harness.store_mut().insert(contact).unwrap();

        harness.run_line("contacts_birthdays 365").await.unwrap();
        assert!(harness.console().output().contains("Anna"));
    }

    #[tokio::test]
    async fn test_export_writes_csv_and_json() {
        let mut harness = Harness::non_interactive(ScriptedConsole::new());
        let err = harness.run_line("contacts_export").await.unwrap_err();
        assert_eq!(AssistantError::find(&err).unwrap().title(), "Not Found");

        let mut contact = Contact::new("Anna");
        contact.phones = vec!["0501234567".to_string(), "0671234567".to_string()];
        harness.store_mut().insert(contact).unwrap();

        harness.run_line("contacts_export").await.unwrap();
        let csv_path = harness.export_dir().join("contacts.csv");
        let written = std::fs::read_to_string(&csv_path).unwrap();
        assert!(written.starts_with("uid,name,address,birthday,phones,emails"));
        assert!(written.contains("Anna,,,0501234567;0671234567,"));

        harness.run_line("contacts_export JSON").await.unwrap();
        let json_path = harness.export_dir().join("contacts.json");
        let decoded: Vec<Contact> =
            serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(decoded[0].name, "Anna");
    }

    #[tokio::test]
    async fn test_export_asks_before_overwriting() {
        let mut harness = Harness::interactive(ScriptedConsole::new());
        harness.store_mut().insert(Contact::new("Anna")).unwrap();
        std::fs::create_dir_all(harness.export_dir()).unwrap();
        std::fs::write(harness.export_dir().join("contacts.csv"), "old").unwrap();

        harness.console().push_answers([Answer::Bool(Some(false))]);
        harness.run_line("contacts_export csv").await.unwrap();
        let kept = std::fs::read_to_string(harness.export_dir().join("contacts.csv")).unwrap();
        assert_eq!(kept, "old");
    }

    #[tokio::test]
    async fn test_menu_queues_action() {
        let mut harness = Harness::non_interactive(ScriptedConsole::new());
        harness.run_line("contacts list").await.unwrap();
        assert_eq!(
            harness.next_queued(),
            Some(QueueItem::typed(CommandName::ContactsList, ListRequest::all()))
        );

        let err = harness.run_line("contacts dance").await.unwrap_err();
        assert_eq!(err.to_string(), "can't parse argument `action`: dance");
    }
}
