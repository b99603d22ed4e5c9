use crate::imports::*;

use chrono::{Datelike, Duration, Weekday};
use serde::{Deserialize, Serialize};

use super::{join_or_dash, or_dash, parse_uid_query};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Uid,
    Name,
    Address,
    Phones,
    Emails,
    Birthday,
}

static CONTACT_FIELDS: LazyLock<FieldRegistry<ContactField>> = LazyLock::new(|| {
    FieldRegistry::build(
        "contacts",
        vec![
            FieldDescriptor::new(ContactField::Uid, "uid")
                .description("unique identifier")
                .exact()
                .not_groupable()
                .parser(parse_uid_query),
            FieldDescriptor::new(ContactField::Name, "name").description("full name"),
            FieldDescriptor::new(ContactField::Address, "address").description("postal address"),
            FieldDescriptor::new(ContactField::Phones, "phones")
                .aliases(&["phone"])
                .description("phone numbers")
                .exact()
                .list(),
            FieldDescriptor::new(ContactField::Emails, "emails")
                .aliases(&["email"])
                .description("email addresses")
                .list(),
            FieldDescriptor::new(ContactField::Birthday, "birthday")
                .aliases(&["bday"])
                .description("date of birth, YYYY-MM-DD"),
        ],
    )
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub uid: Uuid,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phones: Vec<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}

impl Contact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uid: Uuid::now_v7(),
            name: name.into(),
            address: None,
            phones: Vec::new(),
            emails: Vec::new(),
            birthday: None,
        }
    }

    /// Next birthday on or after `today`, if it falls within `days` days. Weekend dates
    /// are moved to the following Monday for the congratulation date.
    pub fn upcoming_birthday(&self, today: NaiveDate, days: i64) -> Option<UpcomingBirthday> {
        let birthday = self.birthday?;
        let mut anniversary = anniversary_in(birthday, today.year());
        if anniversary < today {
            anniversary = anniversary_in(birthday, today.year() + 1);
        }
        if (anniversary - today).num_days() > days {
            return None;
        }
        let congratulate_on = match anniversary.weekday() {
            Weekday::Sat => anniversary + Duration::days(2),
            Weekday::Sun => anniversary + Duration::days(1),
            _ => anniversary,
        };
        Some(UpcomingBirthday {
            uid: self.uid,
            name: self.name.clone(),
            birthday: anniversary,
            congratulate_on,
            turns: anniversary.year() - birthday.year(),
        })
    }
}

// Feb 29 birthdays fall on Feb 28 in non-leap years.
fn anniversary_in(birthday: NaiveDate, year: i32) -> NaiveDate {
    birthday
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, birthday.month(), 28))
        .unwrap_or(birthday)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingBirthday {
    pub uid: Uuid,
    pub name: String,
    pub birthday: NaiveDate,
    pub congratulate_on: NaiveDate,
    pub turns: i32,
}

impl Record for Contact {
    type Field = ContactField;

    const SINGULAR: &'static str = "Contact";
    const PLURAL: &'static str = "Contacts";

    fn fields() -> &'static FieldRegistry<ContactField> {
        &CONTACT_FIELDS
    }

    fn uid(&self) -> Uuid {
        self.uid
    }

    fn field_value(&self, field: ContactField) -> FieldValue<'_> {
        match field {
            ContactField::Uid => FieldValue::Uid(self.uid),
            ContactField::Name => FieldValue::Text(&self.name),
            ContactField::Address => FieldValue::optional_text(self.address.as_deref()),
            ContactField::Phones => FieldValue::List(&self.phones),
            ContactField::Emails => FieldValue::List(&self.emails),
            ContactField::Birthday => self.birthday.map_or(FieldValue::Null, FieldValue::Date),
        }
    }

    fn summary(&self) -> String {
        let mut parts = vec![self.name.clone()];
        if let Some(phone) = self.phones.first() {
            parts.push(phone.clone());
        }
        if let Some(email) = self.emails.first() {
            parts.push(email.clone());
        }
        if let Some(birthday) = self.birthday {
            parts.push(birthday.format(crate::spec::DATE_FORMAT).to_string());
        }
        parts.join(" | ")
    }

    fn card(&self) -> Vec<CardRow> {
        vec![
            CardRow::new("uid", self.uid.to_string()),
            CardRow::new("name", self.name.clone()),
            CardRow::new("address", or_dash(self.address.as_deref())),
            CardRow::new("phones", join_or_dash(&self.phones)),
            CardRow::new("emails", join_or_dash(&self.emails)),
            CardRow::new(
                "birthday",
                self.birthday
                    .map(|date| date.format(crate::spec::DATE_FORMAT).to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]
    }

    fn collection(data: &StoreData) -> &Vec<Self> {
        &data.contacts
    }

    fn collection_mut(data: &mut StoreData) -> &mut Vec<Self> {
        &mut data.contacts
    }
}
