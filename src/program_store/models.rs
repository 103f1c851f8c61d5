//! Program records as they travel between the HTTP layer, validation and SQLite.

use serde::{Deserialize, Deserializer, Serialize};

/// A persisted program, as returned by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: i64,
    pub title: String,
    pub synopsis: String,
    pub poster: String,
    pub country: String,
    pub year: i64,
    pub category_id: Option<i64>,
}

/// A validated program that has not been assigned an id yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProgram {
    pub title: String,
    pub synopsis: String,
    pub poster: String,
    pub country: String,
    pub year: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

impl NewProgram {
    pub fn into_program(self, id: i64) -> Program {
        Program {
            id,
            title: self.title,
            synopsis: self.synopsis,
            poster: self.poster,
            country: self.country,
            year: self.year,
            category_id: self.category_id,
        }
    }
}

/// Per-field instruction of a partial update.
///
/// `Unchanged` keeps whatever is stored, it never clears the column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    Unchanged,
    SetTo(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, FieldUpdate::Unchanged)
    }

    /// The value to bind in a `coalesce(?, column)` statement: `None` binds NULL,
    /// which makes SQLite fall back to the stored value.
    pub fn as_coalesce_param(&self) -> Option<&T> {
        match self {
            FieldUpdate::Unchanged => None,
            FieldUpdate::SetTo(value) => Some(value),
        }
    }

    pub fn apply_to(self, current: &mut T) {
        if let FieldUpdate::SetTo(value) = self {
            *current = value;
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => FieldUpdate::SetTo(value),
            None => FieldUpdate::Unchanged,
        }
    }
}

// An absent key falls back to `Default` (Unchanged); an explicit `null` lands here as None.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(FieldUpdate::from)
    }
}

impl<T: Serialize> Serialize for FieldUpdate<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_coalesce_param().serialize(serializer)
    }
}

/// A partial update of a program. Fields left `Unchanged` keep their stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramPatch {
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub title: FieldUpdate<String>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub synopsis: FieldUpdate<String>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub poster: FieldUpdate<String>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub country: FieldUpdate<String>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub year: FieldUpdate<i64>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub category_id: FieldUpdate<i64>,
}

impl ProgramPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_unchanged()
            && self.synopsis.is_unchanged()
            && self.poster.is_unchanged()
            && self.country.is_unchanged()
            && self.year.is_unchanged()
            && self.category_id.is_unchanged()
    }

    /// Applies the patch in memory, with the same semantics the store uses.
    pub fn apply_to(self, program: &mut Program) {
        self.title.apply_to(&mut program.title);
        self.synopsis.apply_to(&mut program.synopsis);
        self.poster.apply_to(&mut program.poster);
        self.country.apply_to(&mut program.country);
        self.year.apply_to(&mut program.year);
        if let FieldUpdate::SetTo(category_id) = self.category_id {
            program.category_id = Some(category_id);
        }
    }
}

impl From<&Program> for ProgramPatch {
    /// A patch that rewrites every field of `program` (category included only when set).
    fn from(program: &Program) -> Self {
        ProgramPatch {
            title: FieldUpdate::SetTo(program.title.clone()),
            synopsis: FieldUpdate::SetTo(program.synopsis.clone()),
            poster: FieldUpdate::SetTo(program.poster.clone()),
            country: FieldUpdate::SetTo(program.country.clone()),
            year: FieldUpdate::SetTo(program.year),
            category_id: program.category_id.into(),
        }
    }
}

/// A single validation failure, keyed by the offending field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        FieldViolation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dune() -> Program {
        Program {
            id: 1,
            title: "Dune".to_string(),
            synopsis: "Spice.".to_string(),
            poster: "http://p/dune.jpg".to_string(),
            country: "US".to_string(),
            year: 1965,
            category_id: Some(2),
        }
    }

    #[test]
    fn absent_and_null_fields_deserialize_as_unchanged() {
        let patch: ProgramPatch =
            serde_json::from_value(json!({ "year": 2021, "title": null })).unwrap();

        assert_eq!(patch.year, FieldUpdate::SetTo(2021));
        assert_eq!(patch.title, FieldUpdate::Unchanged);
        assert_eq!(patch.synopsis, FieldUpdate::Unchanged);
        assert_eq!(patch.category_id, FieldUpdate::Unchanged);
    }

    #[test]
    fn patch_serializes_only_changed_fields() {
        let patch = ProgramPatch {
            year: FieldUpdate::SetTo(2021),
            ..Default::default()
        };

        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "year": 2021 }));
    }

    #[test]
    fn apply_keeps_unchanged_fields() {
        let mut program = dune();
        let patch = ProgramPatch {
            year: FieldUpdate::SetTo(2021),
            ..Default::default()
        };

        patch.apply_to(&mut program);

        assert_eq!(
            program,
            Program {
                year: 2021,
                ..dune()
            }
        );
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(ProgramPatch::default().is_empty());
        assert!(!ProgramPatch::from(&dune()).is_empty());
    }
}
