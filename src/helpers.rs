use crate::imports::*;

use chrono::Days;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::commands::storage::stats_card;
use crate::config::{AppConfig, HelperCommand};
use crate::console::render::render_card;
use crate::validators::{normalize_emails, normalize_phones, normalize_tags, today};

/*
    Functions:
    * run_helper - Run one maintenance helper against the data directory
    * fill_storage - Add generated records to a store
    * generate_contact / generate_note - One plausible record each

    Helpers run outside the chat session and commit their own changes.
*/

const FIRST_NAMES: &[&str] = &[
    "Anna", "Bohdan", "Carla", "Dmytro", "Elena", "Farid", "Greta", "Hugo", "Iryna", "Jonas",
    "Kateryna", "Liam", "Marta", "Nikolai", "Olena", "Pavel", "Quinn", "Rosa", "Stefan", "Taras",
];

const LAST_NAMES: &[&str] = &[
    "Shevchenko", "Novak", "Kowalski", "Müller", "Garcia", "Bondarenko", "Smith", "Rossi",
    "Lindqvist", "O'Brien", "Dubois", "Kravets", "Petrenko", "Nielsen", "Horvat",
];

const STREETS: &[&str] = &[
    "Khreshchatyk", "Main st", "Baker st", "Rue de Rivoli", "Lindenallee", "Market sq",
];

const CITIES: &[&str] = &["Kyiv", "Lviv", "Warsaw", "Berlin", "Paris", "Lisbon", "Odesa"];

const MAIL_DOMAINS: &[&str] = &["example.com", "example.org", "mail.test"];

const NOTE_WORDS: &[&str] = &[
    "call", "buy", "milk", "meeting", "review", "draft", "plan", "trip", "book", "tickets",
    "invoice", "garden", "paint", "fix", "bike", "birthday", "gift", "recipe", "report",
];

const TAGS: &[&str] = &["home", "work", "errands", "ideas", "family", "travel", "later"];

const MAX_LIST_ITEMS: usize = 3;

#[tracing::instrument(skip(config, console), err)]
pub async fn run_helper(
    command: &HelperCommand,
    config: &AppConfig,
    console: &dyn Console,
) -> Result<()> {
    match command {
        HelperCommand::ShowPaths => {
            let store = DataStore::empty(&config.data_dir);
            let rows = [
                CardRow::new("Data directory", config.data_dir.display().to_string()),
                CardRow::new("Data file", store.path().display().to_string()),
                CardRow::new(
                    "Export directory",
                    config.options.export_dir.display().to_string(),
                ),
            ];
            console.print(Tone::Plain, &render_card("Paths", &rows)?);
        }
        HelperCommand::ClearStorage => {
            let mut store = DataStore::load(&config.data_dir).await?;
            store.clear();
            store.commit().await?;
            render_good(console, "All stored data has been cleared.");
        }
        HelperCommand::FillStorage {
            amount,
            storage_dir,
            init_only,
        } => {
            let dir = storage_dir.as_ref().unwrap_or(&config.data_dir);
            let mut store = DataStore::load(dir).await?;
            fill_storage(&mut store, *amount, *init_only, &mut rand::thread_rng(), console)?;
            store.commit().await?;
            console.print(Tone::Plain, &stats_card(&store)?);
        }
    }
    Ok(())
}

/// Adds `amount` contacts and `amount` notes. With `init_only`, a section that already
/// has records is left alone.
pub fn fill_storage(
    store: &mut DataStore,
    amount: usize,
    init_only: bool,
    rng: &mut impl Rng,
    console: &dyn Console,
) -> Result<()> {
    let today = today();
    if init_only && store.len::<Contact>() > 0 {
        render_canceled(console, "Contacts already exist. Skipping.");
    } else {
        for _ in 0..amount {
            store.insert(generate_contact(rng, today)?)?;
        }
    }

    if init_only && store.len::<Note>() > 0 {
        render_canceled(console, "Notes already exist. Skipping.");
    } else {
        for _ in 0..amount {
            store.insert(generate_note(rng)?)?;
        }
    }
    tracing::info!(amount, init_only, "Storage filled");
    Ok(())
}

fn pick<'a>(rng: &mut impl Rng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

pub fn generate_contact(rng: &mut impl Rng, today: NaiveDate) -> Result<Contact> {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let mut contact = Contact::new(format!("{first} {last}"));

    if rng.gen_bool(0.5) {
        contact.address = Some(format!(
            "{} {}, {}",
            pick(rng, STREETS),
            rng.gen_range(1..200),
            pick(rng, CITIES)
        ));
    }
    if rng.gen_bool(0.5) {
        // Between one and a hundred years old.
        let age_days = rng.gen_range(365..=365 * 100);
        contact.birthday = today.checked_sub_days(Days::new(age_days));
    }

    let phones: Vec<String> = (0..rng.gen_range(0..=MAX_LIST_ITEMS))
        .map(|_| format!("+380{}", rng.gen_range(100_000_000..1_000_000_000u64)))
        .collect();
    contact.phones = normalize_phones(&phones)?;

    let local = format!("{first}.{last}").to_lowercase().replace('\'', "");
    let emails: Vec<String> = (0..rng.gen_range(0..=MAX_LIST_ITEMS))
        .map(|n| format!("{local}{n}@{}", pick(rng, MAIL_DOMAINS)))
        .collect();
    contact.emails = normalize_emails(&emails)?;

    Ok(contact)
}

pub fn generate_note(rng: &mut impl Rng) -> Result<Note> {
    let words: Vec<&str> = (0..rng.gen_range(3..12))
        .map(|_| pick(rng, NOTE_WORDS))
        .collect();
    let mut note = Note::new(words.join(" "));
    if rng.gen_bool(0.7) {
        let mut title = pick(rng, NOTE_WORDS).to_string();
        if let Some(first) = title.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        note.title = Some(title);
    }
    let tags: Vec<String> = (0..rng.gen_range(0..=MAX_LIST_ITEMS))
        .map(|_| pick(rng, TAGS).to_string())
        .collect();
    note.tags = normalize_tags(&tags)?;
    Ok(note)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionOptions;
    use crate::console::scripted::ScriptedConsole;
    use crate::storage::DATA_FILE;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            options: SessionOptions {
                export_dir: dir.join("exports"),
                ..SessionOptions::default()
            },
            data_dir: dir.to_path_buf(),
            predefined_input: None,
            command: None,
        }
    }

    #[test]
    fn test_generated_records_pass_validation() {
        init_tracing();
        let mut rng = StdRng::seed_from_u64(7);
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        for _ in 0..200 {
            let contact = generate_contact(&mut rng, today).unwrap();
            assert!(!contact.name.trim().is_empty());
            assert!(contact.phones.len() <= MAX_LIST_ITEMS);
            if let Some(birthday) = contact.birthday {
                assert!(crate::validators::check_birthday(birthday, today).is_ok());
            }

            let note = generate_note(&mut rng).unwrap();
            assert!(!note.content.is_empty());
            assert!(note.tags.iter().all(|tag| TAGS.contains(&tag.as_str())));
        }
    }

    #[tokio::test]
    async fn test_show_paths() {
        let dir = tempfile::tempdir().unwrap();
        let console = ScriptedConsole::new();
        run_helper(&HelperCommand::ShowPaths, &config(dir.path()), &console)
            .await
            .unwrap();

        let output = console.output();
        assert!(output.contains("== Paths =="));
        assert!(output.contains(&dir.path().join(DATA_FILE).display().to_string()));
        assert!(output.contains("exports"));
        // Showing paths never creates the data file.
        assert!(!dir.path().join(DATA_FILE).exists());
    }

    #[tokio::test]
    async fn test_fill_storage_writes_both_sections() {
        let dir = tempfile::tempdir().unwrap();
        let console = ScriptedConsole::new();
        let command = HelperCommand::FillStorage {
            amount: 4,
            storage_dir: None,
            init_only: false,
        };
        run_helper(&command, &config(dir.path()), &console).await.unwrap();

        let store = DataStore::load(dir.path()).await.unwrap();
        assert_eq!(store.len::<Contact>(), 4);
        assert_eq!(store.len::<Note>(), 4);
        assert!(console.output().contains("== Storage =="));
    }

    #[tokio::test]
    async fn test_fill_storage_into_other_dir() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let command = HelperCommand::FillStorage {
            amount: 2,
            storage_dir: Some(other.path().to_path_buf()),
            init_only: false,
        };
        run_helper(&command, &config(dir.path()), &ScriptedConsole::new())
            .await
            .unwrap();

        assert!(!dir.path().join(DATA_FILE).exists());
        let store = DataStore::load(other.path()).await.unwrap();
        assert_eq!(store.len::<Contact>(), 2);
    }

    #[test]
    fn test_init_only_skips_filled_sections() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DataStore::empty(dir.path());
        store.insert(Contact::new("Anna")).unwrap();
        let console = ScriptedConsole::new();
        let mut rng = StdRng::seed_from_u64(1);

        fill_storage(&mut store, 3, true, &mut rng, &console).unwrap();
        assert_eq!(store.len::<Contact>(), 1);
        assert_eq!(store.len::<Note>(), 3);
        assert_eq!(
            console.output_with(Tone::Warning),
            vec!["Contacts already exist. Skipping."]
        );

        fill_storage(&mut store, 3, false, &mut rng, &console).unwrap();
        assert_eq!(store.len::<Contact>(), 4);
        assert_eq!(store.len::<Note>(), 6);
    }

    #[tokio::test]
    async fn test_clear_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DataStore::empty(dir.path());
        store.insert(Contact::new("Anna")).unwrap();
        store.insert(Note::new("buy milk")).unwrap();
        store.commit().await.unwrap();

        let console = ScriptedConsole::new();
        run_helper(&HelperCommand::ClearStorage, &config(dir.path()), &console)
            .await
            .unwrap();

        let store = DataStore::load(dir.path()).await.unwrap();
        assert_eq!(store.len::<Contact>(), 0);
        assert_eq!(store.len::<Note>(), 0);
        assert_eq!(
            console.output_with(Tone::Good),
            vec!["All stored data has been cleared."]
        );
    }
}
