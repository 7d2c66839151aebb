use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::users::repo_types::User;

pub const NAME_MAX_LEN: usize = 40;
pub const PASSWORD_MIN_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Password,
    PasswordConfirmation,
}

impl Field {
    pub fn human_name(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::PasswordConfirmation => "Password confirmation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    Blank,
    TooLong { maximum: usize },
    TooShort { minimum: usize },
    Invalid,
    Taken,
    Confirmation,
}

impl Rule {
    pub fn message(&self) -> String {
        match self {
            Rule::Blank => "can't be blank".into(),
            Rule::TooLong { maximum } => format!("is too long (maximum is {maximum} characters)"),
            Rule::TooShort { minimum } => {
                format!("is too short (minimum is {minimum} characters)")
            }
            Rule::Invalid => "is invalid".into(),
            Rule::Taken => "has already been taken".into(),
            Rule::Confirmation => "doesn't match Password".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    #[serde(flatten)]
    pub rule: Rule,
}

/// Every failing (field, rule) pair, in check order. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn add(&mut self, field: Field, rule: Rule) {
        self.0.push(FieldError { field, rule });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn on(&self, field: Field) -> impl Iterator<Item = Rule> + '_ {
        self.0
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.rule)
    }

    pub fn contains(&self, field: Field, rule: Rule) -> bool {
        self.on(field).any(|r| r == rule)
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .map(|e| format!("{} {}", e.field.human_name(), e.rule.message()))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Local part of letters, digits and `_+-.`; dot-separated domain labels of
/// letters, digits and `-`; alphabetic final label.
pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"(?i)^[a-z0-9_+\-.]+@[a-z0-9\-]+(\.[a-z0-9\-]+)*\.[a-z]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// All rules that need nothing but the record itself.
pub fn validate_attributes(user: &User) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if is_blank(&user.name) {
        errors.add(Field::Name, Rule::Blank);
    } else if user.name.chars().count() > NAME_MAX_LEN {
        errors.add(
            Field::Name,
            Rule::TooLong {
                maximum: NAME_MAX_LEN,
            },
        );
    }

    if is_blank(&user.email) {
        errors.add(Field::Email, Rule::Blank);
    } else if !is_valid_email(&user.email) {
        errors.add(Field::Email, Rule::Invalid);
    }

    match user.password.as_deref() {
        Some(password) => {
            if is_blank(password) {
                errors.add(Field::Password, Rule::Blank);
            }
            if password.chars().count() < PASSWORD_MIN_LEN {
                errors.add(
                    Field::Password,
                    Rule::TooShort {
                        minimum: PASSWORD_MIN_LEN,
                    },
                );
            }
            if let Some(confirmation) = user.password_confirmation.as_deref() {
                if confirmation != password {
                    errors.add(Field::PasswordConfirmation, Rule::Confirmation);
                }
            }
        }
        // required on create; persisted users keep their digest
        None if user.id.is_none() => errors.add(Field::Password, Rule::Blank),
        None => {}
    }

    errors
}
