//! Field-level validation of program payloads.
//!
//! Validation takes the raw JSON body so that type mismatches ("year" sent as
//! `true`) are reported as field violations rather than as deserialization
//! failures. All fields are checked in one pass, violations are reported in
//! field declaration order.

use super::models::{FieldUpdate, FieldViolation, NewProgram, ProgramPatch};
use reqwest::Url;
use serde_json::{Map, Value};

pub const TITLE_MAX_CHARS: usize = 255;
pub const SYNOPSIS_MAX_CHARS: usize = 1000;
pub const COUNTRY_MAX_CHARS: usize = 255;
pub const YEAR_MIN: i64 = 1900;
pub const YEAR_MAX: i64 = 2100;

struct TextField {
    name: &'static str,
    label: &'static str,
    max_chars: Option<usize>,
    uri: bool,
}

struct IntegerField {
    name: &'static str,
    label: &'static str,
    min: Option<i64>,
    max: Option<i64>,
}

const TITLE: TextField = TextField {
    name: "title",
    label: "Title",
    max_chars: Some(TITLE_MAX_CHARS),
    uri: false,
};

const SYNOPSIS: TextField = TextField {
    name: "synopsis",
    label: "Synopsis",
    max_chars: Some(SYNOPSIS_MAX_CHARS),
    uri: false,
};

const POSTER: TextField = TextField {
    name: "poster",
    label: "Poster URL",
    max_chars: None,
    uri: true,
};

const COUNTRY: TextField = TextField {
    name: "country",
    label: "Country",
    max_chars: Some(COUNTRY_MAX_CHARS),
    uri: false,
};

const YEAR: IntegerField = IntegerField {
    name: "year",
    label: "Year",
    min: Some(YEAR_MIN),
    max: Some(YEAR_MAX),
};

const CATEGORY_ID: IntegerField = IntegerField {
    name: "category_id",
    label: "Category ID",
    min: Some(1),
    max: None,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Presence {
    /// Must be present, non-null and non-blank.
    Required,
    /// May be absent, null or blank.
    Optional,
    /// May be absent or null, but a present value must be non-blank.
    Patch,
}

type FieldResult<T> = Result<Option<T>, FieldViolation>;

struct Fields<'a> {
    body: Option<&'a Map<String, Value>>,
}

impl<'a> Fields<'a> {
    fn of(body: &'a Value) -> Self {
        Fields {
            body: body.as_object(),
        }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.body
            .and_then(|map| map.get(name))
            .filter(|value| !value.is_null())
    }

    fn text(&self, field: &TextField, presence: Presence) -> FieldResult<String> {
        let value = match self.get(field.name) {
            Some(value) => value,
            None => return missing(field.name, field.label, presence),
        };
        let text = match value.as_str() {
            Some(text) => text,
            None => {
                return Err(FieldViolation::new(
                    field.name,
                    format!("{} must be a string.", field.label),
                ))
            }
        };
        // Surrounding whitespace is never stored.
        let text = text.trim();
        if text.is_empty() {
            return blank(field.name, field.label, presence);
        }
        if let Some(max_chars) = field.max_chars {
            if text.chars().count() > max_chars {
                return Err(FieldViolation::new(
                    field.name,
                    format!("{} must not exceed {} characters.", field.label, max_chars),
                ));
            }
        }
        if field.uri && Url::parse(text).is_err() {
            return Err(FieldViolation::new(
                field.name,
                format!("{} must be a valid URL.", field.label),
            ));
        }
        Ok(Some(text.to_string()))
    }

    fn integer(&self, field: &IntegerField, presence: Presence) -> FieldResult<i64> {
        let value = match self.get(field.name) {
            Some(value) => value,
            None => return missing(field.name, field.label, presence),
        };
        let number = match value {
            Value::String(text) if text.trim().is_empty() => {
                return blank(field.name, field.label, presence)
            }
            Value::String(text) => parse_integer_text(text.trim()),
            Value::Number(number) => match (number.as_i64(), number.as_u64()) {
                (Some(integer), _) => Ok(integer),
                (None, Some(_)) => Err(NotAnInteger::TooLarge),
                (None, None) => match number.as_f64() {
                    Some(float) => integral_float(float),
                    None => Err(NotAnInteger::NotANumber),
                },
            },
            _ => Err(NotAnInteger::NotANumber),
        };
        let number = match number {
            Ok(number) => number,
            Err(NotAnInteger::NotANumber) => {
                return Err(FieldViolation::new(
                    field.name,
                    format!("{} must be a number.", field.label),
                ))
            }
            Err(NotAnInteger::Fractional) => {
                return Err(FieldViolation::new(
                    field.name,
                    format!("{} must be an integer.", field.label),
                ))
            }
            Err(NotAnInteger::TooLarge) => {
                return Err(FieldViolation::new(
                    field.name,
                    format!(
                        "{} must be at most {}.",
                        field.label,
                        field.max.unwrap_or(i64::MAX)
                    ),
                ))
            }
            Err(NotAnInteger::TooSmall) => {
                return Err(FieldViolation::new(
                    field.name,
                    format!(
                        "{} must be at least {}.",
                        field.label,
                        field.min.unwrap_or(i64::MIN)
                    ),
                ))
            }
        };
        if let Some(min) = field.min {
            if number < min {
                return Err(FieldViolation::new(
                    field.name,
                    format!("{} must be at least {}.", field.label, min),
                ));
            }
        }
        if let Some(max) = field.max {
            if number > max {
                return Err(FieldViolation::new(
                    field.name,
                    format!("{} must be at most {}.", field.label, max),
                ));
            }
        }
        Ok(Some(number))
    }
}

enum NotAnInteger {
    NotANumber,
    Fractional,
    /// Whole number beyond the `i64` range.
    TooLarge,
    TooSmall,
}

/// Whole floats such as `2000.0` or `2e3` are integers written another way.
fn integral_float(float: f64) -> Result<i64, NotAnInteger> {
    if !float.is_finite() {
        return Err(NotAnInteger::NotANumber);
    }
    if float.fract() != 0.0 {
        return Err(NotAnInteger::Fractional);
    }
    // 2^63 is exactly representable, i64::MAX is not.
    if float >= 9_223_372_036_854_775_808.0 {
        Err(NotAnInteger::TooLarge)
    } else if float < i64::MIN as f64 {
        Err(NotAnInteger::TooSmall)
    } else {
        Ok(float as i64)
    }
}

fn parse_integer_text(text: &str) -> Result<i64, NotAnInteger> {
    if let Ok(integer) = text.parse::<i64>() {
        return Ok(integer);
    }
    match text.parse::<f64>() {
        Ok(float) => integral_float(float),
        Err(_) => Err(NotAnInteger::NotANumber),
    }
}

fn missing<T>(name: &str, label: &str, presence: Presence) -> FieldResult<T> {
    match presence {
        Presence::Required => Err(FieldViolation::new(
            name,
            format!("{} is required.", label),
        )),
        Presence::Optional | Presence::Patch => Ok(None),
    }
}

fn blank<T>(name: &str, label: &str, presence: Presence) -> FieldResult<T> {
    match presence {
        Presence::Required => Err(FieldViolation::new(
            name,
            format!("{} is required.", label),
        )),
        Presence::Optional => Ok(None),
        Presence::Patch => Err(FieldViolation::new(
            name,
            format!("{} must not be empty.", label),
        )),
    }
}

fn collect<T>(result: FieldResult<T>, violations: &mut Vec<FieldViolation>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(violation) => {
            violations.push(violation);
            None
        }
    }
}

/// Validates the body of an add request.
///
/// Every field except `category_id` is required. A body that is not a JSON
/// object is treated as an empty one.
pub fn validate_new_program(body: &Value) -> Result<NewProgram, Vec<FieldViolation>> {
    let fields = Fields::of(body);
    let mut violations = Vec::new();

    let title = collect(fields.text(&TITLE, Presence::Required), &mut violations);
    let synopsis = collect(fields.text(&SYNOPSIS, Presence::Required), &mut violations);
    let poster = collect(fields.text(&POSTER, Presence::Required), &mut violations);
    let country = collect(fields.text(&COUNTRY, Presence::Required), &mut violations);
    let year = collect(fields.integer(&YEAR, Presence::Required), &mut violations);
    let category_id = collect(
        fields.integer(&CATEGORY_ID, Presence::Optional),
        &mut violations,
    );

    match (title, synopsis, poster, country, year) {
        (Some(title), Some(synopsis), Some(poster), Some(country), Some(year))
            if violations.is_empty() =>
        {
            Ok(NewProgram {
                title,
                synopsis,
                poster,
                country,
                year,
                category_id,
            })
        }
        _ => Err(violations),
    }
}

/// Validates the body of an edit request.
///
/// Absent and null fields are left unchanged; present ones go through the same
/// rules as on add.
pub fn validate_program_patch(body: &Value) -> Result<ProgramPatch, Vec<FieldViolation>> {
    let fields = Fields::of(body);
    let mut violations = Vec::new();

    let title = collect(fields.text(&TITLE, Presence::Patch), &mut violations);
    let synopsis = collect(fields.text(&SYNOPSIS, Presence::Patch), &mut violations);
    let poster = collect(fields.text(&POSTER, Presence::Patch), &mut violations);
    let country = collect(fields.text(&COUNTRY, Presence::Patch), &mut violations);
    let year = collect(fields.integer(&YEAR, Presence::Patch), &mut violations);
    let category_id = collect(
        fields.integer(&CATEGORY_ID, Presence::Patch),
        &mut violations,
    );

    if !violations.is_empty() {
        return Err(violations);
    }
    Ok(ProgramPatch {
        title: FieldUpdate::from(title),
        synopsis: FieldUpdate::from(synopsis),
        poster: FieldUpdate::from(poster),
        country: FieldUpdate::from(country),
        year: FieldUpdate::from(year),
        category_id: FieldUpdate::from(category_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dune_json() -> Value {
        json!({
            "title": "Dune",
            "synopsis": "Spice.",
            "poster": "http://p/dune.jpg",
            "country": "US",
            "year": 1965,
            "category_id": 2
        })
    }

    fn fields_of(violations: &[FieldViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn accepts_complete_program() {
        let program = validate_new_program(&dune_json()).unwrap();

        assert_eq!(program.title, "Dune");
        assert_eq!(program.year, 1965);
        assert_eq!(program.category_id, Some(2));
    }

    #[test]
    fn category_is_optional_on_add() {
        let mut body = dune_json();
        body.as_object_mut().unwrap().remove("category_id");

        let program = validate_new_program(&body).unwrap();
        assert_eq!(program.category_id, None);
    }

    #[test]
    fn empty_title_is_the_only_violation() {
        let body = json!({
            "title": "",
            "synopsis": "ok",
            "poster": "http://x",
            "country": "FR",
            "year": 2020
        });

        let violations = validate_new_program(&body).unwrap_err();
        assert_eq!(
            violations,
            vec![FieldViolation::new("title", "Title is required.")]
        );
    }

    #[test]
    fn reports_every_violation_in_field_order() {
        let body = json!({
            "title": "t".repeat(256),
            "synopsis": 42,
            "poster": "not a url",
            "year": 1800,
            "category_id": 0
        });

        let violations = validate_new_program(&body).unwrap_err();
        assert_eq!(
            fields_of(&violations),
            vec!["title", "synopsis", "poster", "country", "year", "category_id"]
        );
        assert_eq!(
            violations[0].message,
            "Title must not exceed 255 characters."
        );
        assert_eq!(violations[1].message, "Synopsis must be a string.");
        assert_eq!(violations[2].message, "Poster URL must be a valid URL.");
        assert_eq!(violations[3].message, "Country is required.");
        assert_eq!(violations[4].message, "Year must be at least 1900.");
        assert_eq!(violations[5].message, "Category ID must be at least 1.");
    }

    #[test]
    fn length_is_counted_in_characters() {
        let mut body = dune_json();
        body["title"] = json!("é".repeat(TITLE_MAX_CHARS));

        assert!(validate_new_program(&body).is_ok());
    }

    #[test]
    fn whitespace_only_text_counts_as_missing() {
        let mut body = dune_json();
        body["country"] = json!("   ");

        let violations = validate_new_program(&body).unwrap_err();
        assert_eq!(
            violations,
            vec![FieldViolation::new("country", "Country is required.")]
        );
    }

    #[test]
    fn integer_fields_accept_numeric_strings() {
        let mut body = dune_json();
        body["year"] = json!("1984");
        body["category_id"] = json!(" 3 ");

        let program = validate_new_program(&body).unwrap();
        assert_eq!(program.year, 1984);
        assert_eq!(program.category_id, Some(3));
    }

    #[test]
    fn rejects_non_integer_years() {
        for (year, message) in [
            (json!(1999.5), "Year must be an integer."),
            (json!("1999.5"), "Year must be an integer."),
            (json!("soon"), "Year must be a number."),
            (json!(true), "Year must be a number."),
            (json!(2101), "Year must be at most 2100."),
        ] {
            let mut body = dune_json();
            body["year"] = year;

            let violations = validate_new_program(&body).unwrap_err();
            assert_eq!(violations, vec![FieldViolation::new("year", message)]);
        }
    }

    #[test]
    fn non_object_body_is_treated_as_empty() {
        let violations = validate_new_program(&json!([1, 2, 3])).unwrap_err();

        assert_eq!(
            fields_of(&violations),
            vec!["title", "synopsis", "poster", "country", "year"]
        );
    }

    #[test]
    fn patch_only_checks_present_fields() {
        let patch = validate_program_patch(&json!({ "year": 2021, "title": null })).unwrap();

        assert_eq!(patch.year, FieldUpdate::SetTo(2021));
        assert_eq!(patch.title, FieldUpdate::Unchanged);
        assert_eq!(patch.poster, FieldUpdate::Unchanged);
    }

    #[test]
    fn patch_rejects_blank_and_invalid_values() {
        let violations =
            validate_program_patch(&json!({ "title": " ", "poster": "nope", "year": 3000 }))
                .unwrap_err();

        assert_eq!(
            violations,
            vec![
                FieldViolation::new("title", "Title must not be empty."),
                FieldViolation::new("poster", "Poster URL must be a valid URL."),
                FieldViolation::new("year", "Year must be at most 2100."),
            ]
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_before_storing() {
        let mut body = dune_json();
        body["title"] = json!("  Dune  ");
        body["poster"] = json!("   http://p/d.jpg   ");

        let program = validate_new_program(&body).unwrap();
        assert_eq!(program.title, "Dune");
        assert_eq!(program.poster, "http://p/d.jpg");

        let patch =
            validate_program_patch(&json!({ "poster": " http://p/d.jpg ", "country": "\tIT\n" }))
                .unwrap();
        assert_eq!(patch.poster, FieldUpdate::SetTo("http://p/d.jpg".to_string()));
        assert_eq!(patch.country, FieldUpdate::SetTo("IT".to_string()));
    }

    #[test]
    fn whole_numbers_outside_i64_report_the_range() {
        for (year, message) in [
            (json!(10_000_000_000_000_000_000u64), "Year must be at most 2100."),
            (json!("10000000000000000000"), "Year must be at most 2100."),
            (json!(-1e30), "Year must be at least 1900."),
        ] {
            let mut body = dune_json();
            body["year"] = year;

            let violations = validate_new_program(&body).unwrap_err();
            assert_eq!(violations, vec![FieldViolation::new("year", message)]);
        }

        let patch = validate_program_patch(&json!({ "category_id": 18_446_744_073_709_551_615u64 }))
            .unwrap_err();
        assert_eq!(
            patch,
            vec![FieldViolation::new(
                "category_id",
                format!("Category ID must be at most {}.", i64::MAX)
            )]
        );
    }

    #[test]
    fn exponent_notation_of_a_whole_number_is_accepted() {
        let mut body = dune_json();
        body["year"] = json!("2e3");

        assert_eq!(validate_new_program(&body).unwrap().year, 2000);
    }

    #[test]
    fn empty_patch_is_valid() {
        assert!(validate_program_patch(&json!({})).unwrap().is_empty());
    }
}
