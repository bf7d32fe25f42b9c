//! Schema validator.
//!
//! Checks a parsed [`Value`] against one of the fixed result schemas and
//! reports every violated constraint with its field path before any typed
//! deserialization happens.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::entities::{Card, DailyFortune, Diagnosis, FortuneCard, PersonalityCard};
use crate::domain::errors::ValidationErrors;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("valid regex"));

/// Which of the fixed structural schemas applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Card,
    Diagnosis,
    PersonalityCard,
    FortuneCard,
    DailyFortune,
}

impl SchemaKind {
    pub fn name(&self) -> &'static str {
        match self {
            SchemaKind::Card => "Card",
            SchemaKind::Diagnosis => "Diagnosis",
            SchemaKind::PersonalityCard => "PersonalityCard",
            SchemaKind::FortuneCard => "FortuneCard",
            SchemaKind::DailyFortune => "DailyFortune",
        }
    }
}

/// A result type with a structural schema
pub trait Schema: DeserializeOwned {
    const KIND: SchemaKind;

    /// Record every violation found in the top-level object
    fn check(object: &ObjectCheck<'_>, errors: &mut ValidationErrors);
}

/// Whether `value` is a `#RGB` or `#RRGGBB` color
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Validate `value` against `T`'s schema and deserialize it
pub fn validate<T: Schema>(value: Value) -> Result<T, ValidationErrors> {
    let mut errors = ValidationErrors::new(T::KIND.name());

    match ObjectCheck::root(&value) {
        Some(object) => T::check(&object, &mut errors),
        None => errors.push("$", format!("expected object, got {}", type_name(&value))),
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value(value).map_err(|err| {
        let mut errors = ValidationErrors::new(T::KIND.name());
        errors.push("$", err.to_string());
        errors
    })
}

/// Output of [`validate_kind`]
#[derive(Debug, Clone, PartialEq)]
pub enum TypedResult {
    Card(Card),
    Diagnosis(Diagnosis),
    PersonalityCard(PersonalityCard),
    FortuneCard(FortuneCard),
    DailyFortune(DailyFortune),
}

/// Validate against a schema chosen at runtime
pub fn validate_kind(value: Value, kind: SchemaKind) -> Result<TypedResult, ValidationErrors> {
    Ok(match kind {
        SchemaKind::Card => TypedResult::Card(validate(value)?),
        SchemaKind::Diagnosis => TypedResult::Diagnosis(validate(value)?),
        SchemaKind::PersonalityCard => TypedResult::PersonalityCard(validate(value)?),
        SchemaKind::FortuneCard => TypedResult::FortuneCard(validate(value)?),
        SchemaKind::DailyFortune => TypedResult::DailyFortune(validate(value)?),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Field accessor over one JSON object that records violations by path
pub struct ObjectCheck<'a> {
    map: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> ObjectCheck<'a> {
    fn root(value: &'a Value) -> Option<Self> {
        value.as_object().map(|map| Self {
            map,
            prefix: String::new(),
        })
    }

    fn path(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.prefix, name)
        }
    }

    fn required(&self, name: &str, errors: &mut ValidationErrors) -> Option<&'a Value> {
        match self.map.get(name) {
            Some(Value::Null) | None => {
                errors.push(self.path(name), "is required");
                None
            }
            Some(value) => Some(value),
        }
    }

    /// Required string, may be empty
    pub fn string(&self, name: &str, errors: &mut ValidationErrors) -> Option<&'a str> {
        let value = self.required(name, errors)?;
        match value.as_str() {
            Some(s) => Some(s),
            None => {
                errors.push(
                    self.path(name),
                    format!("expected string, got {}", type_name(value)),
                );
                None
            }
        }
    }

    /// Required string with at least one non-whitespace character
    pub fn text(&self, name: &str, errors: &mut ValidationErrors) -> Option<&'a str> {
        let s = self.string(name, errors)?;
        if s.trim().is_empty() {
            errors.push(self.path(name), "must not be empty");
            return None;
        }
        Some(s)
    }

    /// Absent or null is fine, anything else must be a string
    pub fn optional_string(&self, name: &str, errors: &mut ValidationErrors) {
        match self.map.get(name) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => errors.push(
                self.path(name),
                format!("expected string, got {}", type_name(other)),
            ),
        }
    }

    pub fn one_of(&self, name: &str, allowed: &[&str], errors: &mut ValidationErrors) {
        if let Some(s) = self.string(name, errors) {
            if !allowed.contains(&s) {
                errors.push(
                    self.path(name),
                    format!("'{}' is not one of {}", s, allowed.join(", ")),
                );
            }
        }
    }

    pub fn hex_color(&self, name: &str, errors: &mut ValidationErrors) {
        if let Some(s) = self.string(name, errors) {
            if !is_hex_color(s) {
                errors.push(
                    self.path(name),
                    format!("'{}' is not a #RGB or #RRGGBB color", s),
                );
            }
        }
    }

    /// Integer-valued number inside `range`. `72.0` is rejected.
    pub fn integer(&self, name: &str, range: RangeInclusive<i64>, errors: &mut ValidationErrors) {
        let Some(value) = self.required(name, errors) else {
            return;
        };
        let Some(n) = value.as_i64() else {
            let reason = match value.as_u64() {
                Some(big) => format!("{} is outside {}..={}", big, range.start(), range.end()),
                None => format!("expected integer, got {}", describe_number(value)),
            };
            errors.push(self.path(name), reason);
            return;
        };
        if !range.contains(&n) {
            errors.push(
                self.path(name),
                format!("{} is outside {}..={}", n, range.start(), range.end()),
            );
        }
    }

    /// Array of non-empty strings with `min..=max` items (`max = None` is unbounded)
    pub fn string_array(
        &self,
        name: &str,
        min: usize,
        max: Option<usize>,
        errors: &mut ValidationErrors,
    ) {
        let Some(value) = self.required(name, errors) else {
            return;
        };
        let Some(items) = value.as_array() else {
            errors.push(
                self.path(name),
                format!("expected array, got {}", type_name(value)),
            );
            return;
        };

        let len = items.len();
        let too_long = max.is_some_and(|max| len > max);
        if len < min || too_long {
            let bound = match max {
                Some(max) if max == min => format!("exactly {}", min),
                Some(max) => format!("{} to {}", min, max),
                None => format!("at least {}", min),
            };
            errors.push(
                self.path(name),
                format!("expected {} items, got {}", bound, len),
            );
        }

        for (i, item) in items.iter().enumerate() {
            let path = format!("{}[{}]", self.path(name), i);
            match item.as_str() {
                Some(s) if s.trim().is_empty() => errors.push(path, "must not be empty"),
                Some(_) => {}
                None => errors.push(path, format!("expected string, got {}", type_name(item))),
            }
        }
    }

    /// Nested object, checked under `name.` paths
    pub fn object(&self, name: &str, errors: &mut ValidationErrors) -> Option<ObjectCheck<'a>> {
        let value = self.required(name, errors)?;
        match value.as_object() {
            Some(map) => Some(ObjectCheck {
                map,
                prefix: self.path(name),
            }),
            None => {
                errors.push(
                    self.path(name),
                    format!("expected object, got {}", type_name(value)),
                );
                None
            }
        }
    }
}

fn describe_number(value: &Value) -> String {
    match value {
        Value::Number(n) => format!("non-integer {}", n),
        other => type_name(other).to_string(),
    }
}
