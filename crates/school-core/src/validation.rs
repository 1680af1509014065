//! # Validation Module
//!
//! Rule-table validation for every inbound payload.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Contract (THIS MODULE)                                       │
//! │  ├── One rule table per input shape                                    │
//! │  ├── Field name → ordered list of rules                                │
//! │  └── Full sweep: every failing field is reported                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Typed input (serde)                                          │
//! │  └── Normalized JSON → CreateClassTest, UpdateExpense, ...             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Persistence (school-db)                                      │
//! │  ├── Existence checks (schoolId)                                       │
//! │  ├── Immutable fields                                                  │
//! │  └── CHECK constraints                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Evaluating a Field
//! ```text
//! field absent / null ──► required? ──yes──► Required error
//!                              │
//!                              no ──► skipped
//! field present ──► rule 1 ──► rule 2 ──► ... (stop at the first failure)
//! ```
//! Rules may normalize the value they accept: numeric strings become
//! numbers, `"true"` becomes `true`, RFC 3339 timestamps become dates,
//! `HH:MM` becomes `HH:MM:SS`.
//!
//! ## Usage
//! ```rust
//! use school_core::validation::{Contract, Rule};
//! use serde_json::json;
//!
//! let contract = Contract::new("CreateSubject")
//!     .required("name", vec![Rule::IsString, Rule::NotEmpty, Rule::MaxLength(50)])
//!     .optional("credits", vec![Rule::IsInteger, Rule::Min(1.0)]);
//!
//! assert!(contract.validate(&json!({ "name": "Physics", "credits": "4" })).is_ok());
//! assert!(contract.partial().validate(&json!({})).is_ok());
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::error::{ValidationError, ValidationErrors};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationErrors>;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern compiles"));

// =============================================================================
// Rules
// =============================================================================

/// One predicate of a field's rule list.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Strings must not be blank, arrays must not be empty.
    NotEmpty,
    IsString,
    /// Numbers; numeric strings are coerced.
    IsNumber,
    /// Whole numbers; numeric strings are coerced.
    IsInteger,
    /// Booleans; `"true"` / `"false"` are coerced.
    IsBoolean,
    /// `YYYY-MM-DD` or RFC 3339, normalized to `YYYY-MM-DD`.
    IsDate,
    /// `HH:MM` or `HH:MM:SS`, normalized to `HH:MM:SS`.
    IsTime,
    OneOf(&'static [&'static str]),
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    MaxDecimals(usize),
    Matches {
        pattern: &'static Lazy<Regex>,
        reason: &'static str,
    },
    Email,
    Phone,
    /// Record identifiers (UUID).
    Identifier,
    IsArray,
    ArrayNotEmpty,
    /// Applies the rules to every element of an array.
    Each(Vec<Rule>),
    /// Validates every element of an array against a nested contract.
    EachObject(&'static Lazy<Contract>),
    /// Custom predicate + message pair.
    Check {
        predicate: fn(&Value) -> bool,
        message: &'static str,
    },
}

impl Rule {
    /// Runs the rule against a present, non-null value.
    fn apply(&self, field: &str, value: &mut Value) -> ValidationResult<()> {
        match self {
            Rule::NotEmpty => {
                let empty = match value {
                    Value::String(s) => s.trim().is_empty(),
                    Value::Array(items) => items.is_empty(),
                    _ => false,
                };
                if empty {
                    return Err(ValidationError::required(field).into());
                }
            }

            Rule::IsString => {
                if !value.is_string() {
                    return Err(invalid_type(field, "a string"));
                }
            }

            Rule::IsNumber => {
                let number = match value {
                    Value::Number(n) => Some(n.clone()),
                    Value::String(s) => parse_number(s),
                    _ => None,
                };
                match number {
                    Some(n) => *value = Value::Number(n),
                    None => return Err(invalid_type(field, "a number")),
                }
            }

            Rule::IsInteger => {
                let integer = match value {
                    Value::Number(n) => as_integer(n),
                    Value::String(s) => parse_number(s).as_ref().and_then(as_integer),
                    _ => None,
                };
                match integer {
                    Some(i) => *value = Value::from(i),
                    None => return Err(invalid_type(field, "an integer")),
                }
            }

            Rule::IsBoolean => {
                let flag = match value {
                    Value::Bool(b) => Some(*b),
                    Value::String(s) if s == "true" => Some(true),
                    Value::String(s) if s == "false" => Some(false),
                    _ => None,
                };
                match flag {
                    Some(b) => *value = Value::Bool(b),
                    None => return Err(invalid_type(field, "a boolean")),
                }
            }

            Rule::IsDate => {
                let text = as_str(field, value)?;
                let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()));
                match date {
                    Some(d) => *value = Value::String(d.format("%Y-%m-%d").to_string()),
                    None => {
                        return Err(ValidationError::invalid_format(
                            field,
                            "must be a date (YYYY-MM-DD)",
                        )
                        .into())
                    }
                }
            }

            Rule::IsTime => {
                let text = as_str(field, value)?;
                let time = NaiveTime::parse_from_str(text, "%H:%M:%S")
                    .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"));
                match time {
                    Ok(t) => *value = Value::String(t.format("%H:%M:%S").to_string()),
                    Err(_) => {
                        return Err(ValidationError::invalid_format(field, "must be a time (HH:MM)").into())
                    }
                }
            }

            Rule::OneOf(allowed) => {
                let text = value.as_str().unwrap_or_default();
                if !allowed.contains(&text) {
                    return Err(ValidationError::NotAllowed {
                        field: field.to_string(),
                        allowed: allowed.iter().map(|a| a.to_string()).collect(),
                    }
                    .into());
                }
            }

            Rule::MinLength(min) => {
                if as_str(field, value)?.chars().count() < *min {
                    return Err(ValidationError::TooShort {
                        field: field.to_string(),
                        min: *min,
                    }
                    .into());
                }
            }

            Rule::MaxLength(max) => {
                if as_str(field, value)?.chars().count() > *max {
                    return Err(ValidationError::TooLong {
                        field: field.to_string(),
                        max: *max,
                    }
                    .into());
                }
            }

            Rule::Min(min) => {
                if as_f64(field, value)? < *min {
                    return Err(ValidationError::TooSmall {
                        field: field.to_string(),
                        min: *min,
                    }
                    .into());
                }
            }

            Rule::Max(max) => {
                if as_f64(field, value)? > *max {
                    return Err(ValidationError::TooLarge {
                        field: field.to_string(),
                        max: *max,
                    }
                    .into());
                }
            }

            Rule::MaxDecimals(places) => {
                let Value::Number(n) = value else {
                    return Err(invalid_type(field, "a number"));
                };
                let text = n.to_string();
                let text = text.strip_suffix(".0").unwrap_or(&text);
                let decimals = text.split_once('.').map(|(_, f)| f.len()).unwrap_or(0);
                if decimals > *places || text.contains(['e', 'E']) {
                    return Err(ValidationError::invalid_format(
                        field,
                        format!("must have at most {} decimal places", places),
                    )
                    .into());
                }
            }

            Rule::Matches { pattern, reason } => {
                if !pattern.is_match(as_str(field, value)?) {
                    return Err(ValidationError::invalid_format(field, *reason).into());
                }
            }

            Rule::Email => {
                if !EMAIL.is_match(as_str(field, value)?.trim()) {
                    return Err(ValidationError::invalid_format(field, "must be an email address").into());
                }
            }

            Rule::Phone => {
                let cleaned: String = as_str(field, value)?
                    .chars()
                    .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
                    .collect();
                if !PHONE.is_match(&cleaned) {
                    return Err(ValidationError::invalid_format(field, "must be a phone number").into());
                }
            }

            Rule::Identifier => {
                if uuid::Uuid::parse_str(as_str(field, value)?).is_err() {
                    return Err(ValidationError::invalid_format(field, "must be a valid identifier").into());
                }
            }

            Rule::IsArray => {
                if !value.is_array() {
                    return Err(invalid_type(field, "an array"));
                }
            }

            Rule::ArrayNotEmpty => match value {
                Value::Array(items) if items.is_empty() => {
                    return Err(ValidationError::EmptyList {
                        field: field.to_string(),
                    }
                    .into())
                }
                Value::Array(_) => {}
                _ => return Err(invalid_type(field, "an array")),
            },

            Rule::Each(rules) => {
                let Value::Array(items) = value else {
                    return Err(invalid_type(field, "an array"));
                };
                let mut errors = ValidationErrors::new();
                for (index, item) in items.iter_mut().enumerate() {
                    let path = format!("{}[{}]", field, index);
                    if item.is_null() {
                        errors.push(ValidationError::required(path));
                        continue;
                    }
                    if let Err(e) = apply_rules(rules, &path, item) {
                        errors.extend(e);
                    }
                }
                errors.into_result(())?;
            }

            Rule::EachObject(contract) => {
                let Value::Array(items) = value else {
                    return Err(invalid_type(field, "an array"));
                };
                let mut errors = ValidationErrors::new();
                for (index, item) in items.iter_mut().enumerate() {
                    let prefix = format!("{}[{}]", field, index);
                    match contract.validate_at(&prefix, item) {
                        Ok(normalized) => *item = Value::Object(normalized),
                        Err(e) => errors.extend(e),
                    }
                }
                errors.into_result(())?;
            }

            Rule::Check { predicate, message } => {
                if !predicate(value) {
                    return Err(ValidationError::Custom {
                        field: field.to_string(),
                        message: message.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}

/// Runs rules in order, stopping at the first failure.
fn apply_rules(rules: &[Rule], field: &str, value: &mut Value) -> ValidationResult<()> {
    for rule in rules {
        rule.apply(field, value)?;
    }
    Ok(())
}

fn invalid_type(field: &str, expected: &str) -> ValidationErrors {
    ValidationError::InvalidType {
        field: field.to_string(),
        expected: expected.to_string(),
    }
    .into()
}

fn as_str<'a>(field: &str, value: &'a Value) -> ValidationResult<&'a str> {
    value.as_str().ok_or_else(|| invalid_type(field, "a string"))
}

fn as_f64(field: &str, value: &Value) -> ValidationResult<f64> {
    value.as_f64().ok_or_else(|| invalid_type(field, "a number"))
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::from(i));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

fn as_integer(number: &Number) -> Option<i64> {
    if let Some(i) = number.as_i64() {
        return Some(i);
    }
    let f = number.as_f64()?;
    (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

// =============================================================================
// Contracts
// =============================================================================

/// A field of a contract: its wire name, whether it must be present, and
/// its ordered rules.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub rules: Vec<Rule>,
}

/// The rule table of one input shape.
#[derive(Debug, Clone)]
pub struct Contract {
    name: String,
    fields: Vec<FieldSpec>,
}

impl Contract {
    /// Creates an empty contract.
    pub fn new(name: impl Into<String>) -> Self {
        Contract {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field that must be present.
    pub fn required(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldSpec {
            name,
            required: true,
            rules,
        });
        self
    }

    /// Adds a field whose rules apply only when it is present.
    pub fn optional(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldSpec {
            name,
            required: false,
            rules,
        });
        self
    }

    /// Derives the partial-update variant: every field optional, every
    /// rule kept.
    pub fn partial(&self) -> Contract {
        Contract {
            name: format!("{}(partial)", self.name),
            fields: self
                .fields
                .iter()
                .map(|f| FieldSpec {
                    required: false,
                    ..f.clone()
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates an input object.
    ///
    /// ## Returns
    /// * `Ok(Map)` - normalized object holding only declared, non-null fields
    /// * `Err(ValidationErrors)` - every failing field, in declaration order,
    ///   followed by undeclared keys
    pub fn validate(&self, input: &Value) -> ValidationResult<Map<String, Value>> {
        self.validate_at("", input)
    }

    fn validate_at(&self, prefix: &str, input: &Value) -> ValidationResult<Map<String, Value>> {
        let path = |name: &str| {
            if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{}.{}", prefix, name)
            }
        };

        let Value::Object(object) = input else {
            let field = if prefix.is_empty() { "body" } else { prefix };
            return Err(invalid_type(field, "an object"));
        };

        let mut errors = ValidationErrors::new();
        let mut normalized = Map::new();

        for spec in &self.fields {
            let field = path(spec.name);
            match object.get(spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        errors.push(ValidationError::required(field));
                    }
                }
                Some(value) => {
                    let mut value = value.clone();
                    match apply_rules(&spec.rules, &field, &mut value) {
                        Ok(()) => {
                            normalized.insert(spec.name.to_string(), value);
                        }
                        Err(e) => errors.extend(e),
                    }
                }
            }
        }

        for key in object.keys() {
            if self.field(key).is_none() {
                errors.push(ValidationError::UnknownField { field: path(key) });
            }
        }

        errors.into_result(normalized)
    }
}

// =============================================================================
// Typed Inputs
// =============================================================================

/// An input type bound to its contract.
///
/// ## Example
/// ```rust,ignore
/// let input = CreateClassTest::parse(&body)?;
/// ```
pub trait ValidatedInput: DeserializeOwned {
    /// The rule table for this input.
    fn contract() -> &'static Contract;

    /// Validates, normalizes and deserializes the input.
    fn parse(input: &Value) -> ValidationResult<Self> {
        let normalized = Self::contract().validate(input)?;
        serde_json::from_value(Value::Object(normalized))
            .map_err(|e| ValidationError::invalid_format("body", e.to_string()).into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
