use crate::imports::*;

use serde::{Deserialize, Serialize};

use super::{join_or_dash, or_dash, parse_uid_query};

const SUMMARY_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Uid,
    Title,
    Content,
    Tags,
}

static NOTE_FIELDS: LazyLock<FieldRegistry<NoteField>> = LazyLock::new(|| {
    FieldRegistry::build(
        "notes",
        vec![
            FieldDescriptor::new(NoteField::Uid, "uid")
                .exact()
                .not_groupable()
                .parser(parse_uid_query),
            FieldDescriptor::new(NoteField::Title, "title"),
            FieldDescriptor::new(NoteField::Content, "content")
                .aliases(&["body"])
                .not_groupable(),
            FieldDescriptor::new(NoteField::Tags, "tags")
                .aliases(&["tag"])
                .list(),
        ],
    )
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub uid: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Note {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            uid: Uuid::now_v7(),
            title: None,
            content: content.into(),
            tags: Vec::new(),
        }
    }

    pub fn heading(&self) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => {
                let first_line = self.content.lines().next().unwrap_or_default();
                let mut heading: String = first_line.chars().take(SUMMARY_WIDTH).collect();
                if first_line.chars().count() > SUMMARY_WIDTH {
                    heading.push_str("...");
                }
                heading
            }
        }
    }
}

impl Record for Note {
    type Field = NoteField;

    const SINGULAR: &'static str = "Note";
    const PLURAL: &'static str = "Notes";

    fn fields() -> &'static FieldRegistry<NoteField> {
        &NOTE_FIELDS
    }

    fn uid(&self) -> Uuid {
        self.uid
    }

    fn field_value(&self, field: NoteField) -> FieldValue<'_> {
        match field {
            NoteField::Uid => FieldValue::Uid(self.uid),
            NoteField::Title => FieldValue::optional_text(self.title.as_deref()),
            NoteField::Content => FieldValue::Text(&self.content),
            NoteField::Tags => FieldValue::List(&self.tags),
        }
    }

    fn summary(&self) -> String {
        if self.tags.is_empty() {
            self.heading()
        } else {
            format!("{} [{}]", self.heading(), self.tags.join(", "))
        }
    }

    fn card(&self) -> Vec<CardRow> {
        vec![
            CardRow::new("uid", self.uid.to_string()),
            CardRow::new("title", or_dash(self.title.as_deref())),
            CardRow::new("tags", join_or_dash(&self.tags)),
            CardRow::new("content", self.content.clone()),
        ]
    }

    fn collection(data: &StoreData) -> &Vec<Self> {
        &data.notes
    }

    fn collection_mut(data: &mut StoreData) -> &mut Vec<Self> {
        &mut data.notes
    }
}
