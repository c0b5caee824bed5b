//! Schema validation for context values
//!
//! Validation is permissive on unknown data and strict on recognized fields:
//! unrecognized keys are dropped without a report, while every violation of
//! a known field's rule is collected.
//!
//! | field | rule |
//! |---|---|
//! | `account`, `team`, `region` | non-empty string |
//! | `moniker` | lowercase alphanumerics and inner hyphens, 1-64 chars |
//! | `provider` | one of `aws`, `azure`, `mock` |
//! | `activeApp` | object with `account`, `team`, `moniker` obeying the rules above |

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::{ActiveApp, Context, ContextPatch, Field, Patch, Provider};
use crate::{Error, Result};

const MONIKER_MAX_LEN: usize = 64;

static MONIKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$").unwrap());

static MONIKER_SINGLE_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]$").unwrap());

/// A single rule violation, addressed by a dotted field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    fn under(mut self, parent: &str) -> Self {
        self.path = if self.path.is_empty() {
            parent.to_string()
        } else {
            format!("{}.{}", parent, self.path)
        };
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found in one value, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(pub Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any violation is addressed at `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.0.iter().any(|v| v.path == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

type Parsed<T> = std::result::Result<T, Vec<Violation>>;

/// Validate a raw JSON value into a [`Context`].
///
/// Never panics; returns all violations when any field is invalid.
pub fn validate(value: &Value) -> std::result::Result<Context, ValidationErrors> {
    let map = as_object(value)?;
    let mut errors = Vec::new();
    let patch = read_fields(map, NullPolicy::Reject, &mut errors);
    finish(errors, patch.into_context())
}

/// [`validate`], but failing with an aggregated [`Error::Validation`].
pub fn validate_strict(value: &Value) -> Result<Context> {
    validate(value).map_err(Error::Validation)
}

/// Validate a raw JSON update where `null` requests deletion of a key.
pub fn validate_patch(value: &Value) -> std::result::Result<ContextPatch, ValidationErrors> {
    let map = as_object(value)?;
    let mut errors = Vec::new();
    let patch = read_fields(map, NullPolicy::Clear, &mut errors);
    finish(errors, patch)
}

/// Apply the field rules to an already typed update.
///
/// Only `Set` values are checked; `Keep` and `Clear` are always valid.
pub fn check_patch(patch: &ContextPatch) -> std::result::Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    let text_fields = [
        (Field::Account, &patch.account),
        (Field::Team, &patch.team),
        (Field::Region, &patch.region),
    ];
    for (field, slot) in text_fields {
        if let Some(value) = slot.as_set() {
            collect(&mut errors, field.key(), check_text(value));
        }
    }
    if let Some(moniker) = patch.moniker.as_set() {
        collect(&mut errors, Field::Moniker.key(), check_moniker(moniker));
    }
    if let Some(app) = patch.active_app.as_set() {
        let key = Field::ActiveApp.key();
        let nested = [
            ("account", check_text(&app.account)),
            ("team", check_text(&app.team)),
            ("moniker", check_moniker(&app.moniker)),
        ];
        for (member, outcome) in nested {
            if let Err(message) = outcome {
                errors.push(Violation::new(format!("{}.{}", key, member), message));
            }
        }
    }

    finish(errors, ())
}

/// [`check_patch`] for a whole context.
pub fn check_context(context: &Context) -> std::result::Result<(), ValidationErrors> {
    check_patch(&context.clone().into_patch())
}

#[derive(Clone, Copy)]
enum NullPolicy {
    Reject,
    Clear,
}

fn as_object(value: &Value) -> std::result::Result<&Map<String, Value>, ValidationErrors> {
    value.as_object().ok_or_else(|| {
        ValidationErrors(vec![Violation::new(
            "$",
            format!("expected a JSON object, got {}", kind(value)),
        )])
    })
}

fn finish<T>(errors: Vec<Violation>, value: T) -> std::result::Result<T, ValidationErrors> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(ValidationErrors(errors))
    }
}

fn collect(errors: &mut Vec<Violation>, path: &str, outcome: std::result::Result<(), String>) {
    if let Err(message) = outcome {
        errors.push(Violation::new(path, message));
    }
}

fn read_fields(
    map: &Map<String, Value>,
    nulls: NullPolicy,
    errors: &mut Vec<Violation>,
) -> ContextPatch {
    ContextPatch {
        account: read_field(map, Field::Account, nulls, errors, parse_text),
        team: read_field(map, Field::Team, nulls, errors, parse_text),
        moniker: read_field(map, Field::Moniker, nulls, errors, parse_moniker),
        provider: read_field(map, Field::Provider, nulls, errors, parse_provider),
        region: read_field(map, Field::Region, nulls, errors, parse_text),
        active_app: read_field(map, Field::ActiveApp, nulls, errors, parse_active_app),
    }
}

fn read_field<T>(
    map: &Map<String, Value>,
    field: Field,
    nulls: NullPolicy,
    errors: &mut Vec<Violation>,
    parse: fn(&Value) -> Parsed<T>,
) -> Patch<T> {
    let key = field.key();
    match (map.get(key), nulls) {
        (None, _) => Patch::Keep,
        (Some(Value::Null), NullPolicy::Clear) => Patch::Clear,
        (Some(Value::Null), NullPolicy::Reject) => {
            errors.push(Violation::new(key, "must not be null"));
            Patch::Keep
        }
        (Some(value), _) => match parse(value) {
            Ok(parsed) => Patch::Set(parsed),
            Err(violations) => {
                errors.extend(violations.into_iter().map(|v| v.under(key)));
                Patch::Keep
            }
        },
    }
}

fn parse_text(value: &Value) -> Parsed<String> {
    let text = expect_str(value)?;
    check_text(text).map_err(|m| vec![Violation::new("", m)])?;
    Ok(text.to_string())
}

fn parse_moniker(value: &Value) -> Parsed<String> {
    let text = expect_str(value)?;
    check_moniker(text).map_err(|m| vec![Violation::new("", m)])?;
    Ok(text.to_string())
}

fn parse_provider(value: &Value) -> Parsed<Provider> {
    expect_str(value)?
        .parse()
        .map_err(|m: String| vec![Violation::new("", m)])
}

fn parse_active_app(value: &Value) -> Parsed<ActiveApp> {
    let Some(map) = value.as_object() else {
        return Err(vec![Violation::new(
            "",
            format!("expected an object, got {}", kind(value)),
        )]);
    };

    let mut errors = Vec::new();
    let mut member = |name: &str, parse: fn(&Value) -> Parsed<String>| match map.get(name) {
        None | Some(Value::Null) => {
            errors.push(Violation::new(name, "is required"));
            None
        }
        Some(v) => match parse(v) {
            Ok(text) => Some(text),
            Err(violations) => {
                errors.extend(violations.into_iter().map(|v| v.under(name)));
                None
            }
        },
    };

    let account = member("account", parse_text);
    let team = member("team", parse_text);
    let moniker = member("moniker", parse_moniker);

    match (account, team, moniker) {
        (Some(account), Some(team), Some(moniker)) => Ok(ActiveApp {
            account,
            team,
            moniker,
        }),
        _ => Err(errors),
    }
}

fn expect_str(value: &Value) -> Parsed<&str> {
    value
        .as_str()
        .ok_or_else(|| vec![Violation::new("", format!("expected a string, got {}", kind(value)))])
}

fn check_text(text: &str) -> std::result::Result<(), String> {
    if text.is_empty() {
        return Err("must not be empty".to_string());
    }
    Ok(())
}

fn check_moniker(moniker: &str) -> std::result::Result<(), String> {
    if moniker.is_empty() || moniker.len() > MONIKER_MAX_LEN {
        return Err(format!(
            "must be between 1 and {} characters (got {})",
            MONIKER_MAX_LEN,
            moniker.len()
        ));
    }
    if MONIKER_SINGLE_CHAR.is_match(moniker) || MONIKER_PATTERN.is_match(moniker) {
        Ok(())
    } else {
        Err(format!(
            "must contain only lowercase letters, digits and inner hyphens (got \"{}\")",
            moniker
        ))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
