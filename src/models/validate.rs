use chrono::NaiveDateTime;
use garde::Report;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::timestamp::parse_timestamp;

/// A single violated constraint, located by its path in the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl Violation {
    pub fn new(location: &str, field: &str, kind: &'static str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec![location.to_string(), field.to_string()],
            msg: msg.into(),
            kind,
        }
    }
}

#[derive(Debug, Error)]
#[error("{}", describe(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }
}

fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.loc.join("."), v.msg))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Flattens a garde report into messages, prefixed by the failing path when
/// there is one.
pub fn report_messages(report: &Report) -> Vec<String> {
    report
        .iter()
        .map(|(path, error)| {
            let path = path.to_string();
            if path.is_empty() {
                error.message().to_string()
            } else {
                format!("{}: {}", path, error.message())
            }
        })
        .collect()
}

/// Lenient boolean spellings, as accepted from query strings and bodies.
pub fn parse_lax_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "on" | "t" | "true" | "y" | "yes" => Some(true),
        "0" | "off" | "f" | "false" | "n" | "no" => Some(false),
        _ => None,
    }
}

/// Closed set of string values, matched exactly.
pub trait Choice: Sized + Copy + 'static {
    const VARIANTS: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.as_str() == value)
    }

    fn expected() -> String {
        let quoted: Vec<String> = Self::VARIANTS
            .iter()
            .map(|v| format!("'{}'", v.as_str()))
            .collect();
        match quoted.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
            Some((last, _)) => last.clone(),
            None => String::new(),
        }
    }
}

/// Walks the fields of a JSON object, collecting every violation instead of
/// stopping at the first one.
pub struct FieldReader<'a> {
    location: &'static str,
    object: &'a Map<String, Value>,
    violations: Vec<Violation>,
}

impl<'a> FieldReader<'a> {
    pub fn new(location: &'static str, raw: &'a Value) -> Result<Self, ValidationError> {
        match raw {
            Value::Object(object) => Ok(Self {
                location,
                object,
                violations: Vec::new(),
            }),
            _ => Err(ValidationError {
                violations: vec![Violation {
                    loc: vec![location.to_string()],
                    msg: "Input should be a valid dictionary or object".to_string(),
                    kind: "model_attributes_type",
                }],
            }),
        }
    }

    fn reject(&mut self, field: &str, kind: &'static str, msg: impl Into<String>) {
        self.violations
            .push(Violation::new(self.location, field, kind, msg));
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        let object: &'a Map<String, Value> = self.object;
        object.get(field)
    }

    /// Present and non-null value for `field`.
    fn present(&self, field: &str) -> Option<&'a Value> {
        match self.get(field) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        }
    }

    pub fn required_str(&mut self, field: &str) -> Option<String> {
        match self.get(field) {
            None => {
                self.reject(field, "missing", "Field required");
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.reject(field, "string_type", "Input should be a valid string");
                None
            }
        }
    }

    pub fn optional_str(&mut self, field: &str) -> Option<String> {
        match self.present(field)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.reject(field, "string_type", "Input should be a valid string");
                None
            }
        }
    }

    /// Optional string further checked by `parse`; each reason the parser
    /// gives becomes a violation on `field`.
    pub fn optional_parsed<T>(
        &mut self,
        field: &str,
        parse: impl FnOnce(&str) -> Result<T, Vec<String>>,
    ) -> Option<T> {
        let raw = self.optional_str(field)?;
        match parse(&raw) {
            Ok(value) => Some(value),
            Err(reasons) => {
                for reason in reasons {
                    self.reject(field, "value_error", format!("value is not valid: {reason}"));
                }
                None
            }
        }
    }

    /// Accepts JSON booleans, the integers 0 and 1, and the spellings of
    /// [`parse_lax_bool`].
    pub fn bool_or(&mut self, field: &str, default: bool) -> bool {
        let parsed = match self.get(field) {
            None => return default,
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Some(Value::String(s)) => parse_lax_bool(s),
            Some(_) => None,
        };
        parsed.unwrap_or_else(|| {
            self.reject(field, "bool_type", "Input should be a valid boolean");
            default
        })
    }

    pub fn choice_or<T: Choice>(&mut self, field: &str, default: T) -> T {
        let parsed = match self.get(field) {
            None => return default,
            Some(Value::String(s)) => T::parse(s),
            Some(_) => None,
        };
        parsed.unwrap_or_else(|| {
            self.reject(field, "enum", format!("Input should be {}", T::expected()));
            default
        })
    }

    pub fn optional_timestamp(&mut self, field: &str) -> Option<NaiveDateTime> {
        let value = self.present(field)?;
        match parse_timestamp(value) {
            Ok(ts) => Some(ts),
            Err(reason) => {
                self.reject(
                    field,
                    "datetime_parsing",
                    format!("Input should be a valid datetime, {reason}"),
                );
                None
            }
        }
    }

    /// Ends the walk. Required values read through this reader are present
    /// whenever this returns `Ok`.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: self.violations,
            })
        }
    }
}
