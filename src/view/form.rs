//! Form drafts filled in by the user before they are sent to the server.

use crate::program_store::{FieldViolation, Program};
use serde_json::{Map, Value};
use std::fmt;

/// An editable program attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum FormField {
    Title,
    Synopsis,
    Poster,
    Country,
    Year,
    CategoryId,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Title,
        FormField::Synopsis,
        FormField::Poster,
        FormField::Country,
        FormField::Year,
        FormField::CategoryId,
    ];

    /// Key of the field in JSON payloads and violation reports.
    pub fn key(&self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Synopsis => "synopsis",
            FormField::Poster => "poster",
            FormField::Country => "country",
            FormField::Year => "year",
            FormField::CategoryId => "category_id",
        }
    }

    fn required_message(&self) -> &'static str {
        match self {
            FormField::Title => "Title is required.",
            FormField::Synopsis => "Synopsis is required.",
            FormField::Poster => "Poster URL is required.",
            FormField::Country => "Country is required.",
            FormField::Year => "Year is required.",
            FormField::CategoryId => "Category ID is required.",
        }
    }

    fn is_required(&self) -> bool {
        !matches!(self, FormField::CategoryId)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Draft of a new program, holding raw user input.
///
/// Numeric fields are kept as typed so that the server can report a
/// malformed year instead of the client silently dropping it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramForm {
    pub title: String,
    pub synopsis: String,
    pub poster: String,
    pub country: String,
    pub year: String,
    pub category_id: String,
}

impl ProgramForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Synopsis => &self.synopsis,
            FormField::Poster => &self.poster,
            FormField::Country => &self.country,
            FormField::Year => &self.year,
            FormField::CategoryId => &self.category_id,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Title => self.title = value,
            FormField::Synopsis => self.synopsis = value,
            FormField::Poster => self.poster = value,
            FormField::Country => self.country = value,
            FormField::Year => self.year = value,
            FormField::CategoryId => self.category_id = value,
        }
    }

    pub fn reset(&mut self) {
        *self = ProgramForm::default();
    }

    /// Client-side presence check. Type, length and range rules are left to the server.
    pub fn check_required(&self) -> Vec<FieldViolation> {
        FormField::ALL
            .iter()
            .filter(|field| field.is_required() && self.get(**field).trim().is_empty())
            .map(|field| FieldViolation::new(field.key(), field.required_message()))
            .collect()
    }

    /// JSON body of the add request. Blank optional fields are omitted and
    /// numeric input that parses is sent as a number.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        for field in FormField::ALL {
            let raw = self.get(field);
            if raw.trim().is_empty() && !field.is_required() {
                continue;
            }
            let value = match field {
                FormField::Year | FormField::CategoryId => match raw.trim().parse::<i64>() {
                    Ok(number) => Value::from(number),
                    Err(_) => Value::from(raw),
                },
                _ => Value::from(raw),
            };
            body.insert(field.key().to_string(), value);
        }
        Value::Object(body)
    }
}

/// Applies raw input to an edit draft. Numeric fields must parse here since
/// the draft holds typed values.
pub fn apply_edit_input(
    program: &mut Program,
    field: FormField,
    value: &str,
) -> Result<(), FieldViolation> {
    match field {
        FormField::Title => program.title = value.to_string(),
        FormField::Synopsis => program.synopsis = value.to_string(),
        FormField::Poster => program.poster = value.to_string(),
        FormField::Country => program.country = value.to_string(),
        FormField::Year => {
            program.year = value
                .trim()
                .parse()
                .map_err(|_| FieldViolation::new("year", "Year must be a number."))?
        }
        FormField::CategoryId => {
            program.category_id = match value.trim() {
                "" => None,
                raw => Some(raw.parse().map_err(|_| {
                    FieldViolation::new("category_id", "Category ID must be a number.")
                })?),
            }
        }
    }
    Ok(())
}

/// Presence check of an edit draft before it is sent.
pub fn check_edit_required(program: &Program) -> Vec<FieldViolation> {
    [
        (FormField::Title, &program.title),
        (FormField::Synopsis, &program.synopsis),
        (FormField::Poster, &program.poster),
        (FormField::Country, &program.country),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| FieldViolation::new(field.key(), field.required_message()))
    .collect()
}
