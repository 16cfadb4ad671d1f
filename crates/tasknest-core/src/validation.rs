//! Declarative request-body validation.
//!
//! A [`Schema`] is an ordered list of [`FieldRule`]s checked against a raw
//! JSON body before any business logic runs. Every violated rule is
//! reported, not only the first one, so a client can fix a form in one
//! round trip.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

const EMPTY_MESSAGE: &str = "Must not be empty";
const EMAIL_MESSAGE: &str = "Must be a valid email";

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Every rule a request body violated, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldViolation>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages only, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.message.as_str()).collect()
    }

    /// True if any violation concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

/// Constraints on a single string field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: &'static str,
    required: bool,
    email: bool,
    min_len: Option<usize>,
}

impl FieldRule {
    /// An optional string field with no further constraints.
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            email: false,
            min_len: None,
        }
    }

    /// Reject absent, `null` and empty values.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Require an email-shaped value.
    pub const fn email(mut self) -> Self {
        self.email = true;
        self
    }

    /// Require at least `n` characters.
    pub const fn min_len(mut self, n: usize) -> Self {
        self.min_len = Some(n);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn check(&self, value: Option<&Value>, out: &mut Vec<FieldViolation>) {
        let text = match value {
            None | Some(Value::Null) => {
                if self.required {
                    out.push(FieldViolation::new(self.name, EMPTY_MESSAGE));
                }
                return;
            }
            Some(Value::String(s)) => s,
            Some(_) => {
                out.push(FieldViolation::new(
                    self.name,
                    format!("{} must be a `string` type", self.name),
                ));
                return;
            }
        };

        if text.is_empty() {
            if self.required {
                out.push(FieldViolation::new(self.name, EMPTY_MESSAGE));
            }
            return;
        }

        if self.email && !EMAIL_RE.is_match(text) {
            out.push(FieldViolation::new(self.name, EMAIL_MESSAGE));
        }

        if let Some(min) = self.min_len {
            if text.chars().count() < min {
                out.push(FieldViolation::new(
                    self.name,
                    format!("{} must be at least {} characters", self.name, min),
                ));
            }
        }
    }
}

/// An ordered set of field rules for one request body.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldRule>,
}

impl Schema {
    pub fn new(fields: Vec<FieldRule>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// Check `body` against every rule.
    pub fn validate(&self, body: &Value) -> Result<(), ValidationErrors> {
        let Some(object) = body.as_object() else {
            return Err(ValidationErrors(vec![FieldViolation::new(
                "body",
                "Request body must be a JSON object",
            )]));
        };
        self.validate_object(object)
    }

    fn validate_object(&self, object: &Map<String, Value>) -> Result<(), ValidationErrors> {
        let mut violations = Vec::new();
        for rule in &self.fields {
            rule.check(object.get(rule.name), &mut violations);
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(violations))
        }
    }
}

// =============================================================================
// Request schemas
// =============================================================================

fn email_field() -> FieldRule {
    FieldRule::string("email").required().email()
}

fn password_field() -> FieldRule {
    FieldRule::string("password").required().min_len(8)
}

/// POST /users/signup
pub fn signup_schema() -> Schema {
    Schema::new(vec![
        FieldRule::string("userName").required(),
        password_field(),
        email_field(),
    ])
}

/// POST /users/login
pub fn login_schema() -> Schema {
    Schema::new(vec![email_field(), password_field()])
}

/// PUT /users/changePassword
pub fn change_password_schema() -> Schema {
    Schema::new(vec![
        email_field(),
        password_field(),
        FieldRule::string("newPassword"),
    ])
}

/// PUT /users/changeEmail
pub fn change_email_schema() -> Schema {
    Schema::new(vec![
        email_field(),
        password_field(),
        FieldRule::string("newEmail"),
    ])
}

/// POST /todos. A missing title is reported by the handler itself.
pub fn create_todo_schema() -> Schema {
    Schema::new(vec![FieldRule::string("title")])
}

/// PUT /todos/{id}. Field types are enforced when the body is deserialized.
pub fn update_todo_schema() -> Schema {
    Schema::default()
}
