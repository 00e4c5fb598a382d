use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Attribute a validation rule is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Password,
    Content,
    ProfileImage,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Password => write!(f, "password"),
            Field::Content => write!(f, "content"),
            Field::ProfileImage => write!(f, "profile_image"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Blank,
    TooShort(usize),
    TooLong(usize),
    InvalidFormat,
    Taken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ValidationError {
    pub field: Field,
    pub rule: Rule,
}

impl ValidationError {
    pub fn new(field: Field, rule: Rule) -> Self {
        Self { field, rule }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            Rule::Blank => write!(f, "{} can't be blank", self.field),
            Rule::TooShort(min) => write!(f, "{} is too short (minimum is {} characters)", self.field, min),
            Rule::TooLong(max) => write!(f, "{} is too long (maximum is {} characters)", self.field, max),
            Rule::InvalidFormat => write!(f, "{} is invalid", self.field),
            Rule::Taken => write!(f, "{} has already been taken", self.field),
        }
    }
}

/// Every rule an attribute set failed, in the order the rules ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: Field, rule: Rule) {
        let error = ValidationError::new(field, rule);
        if !self.0.contains(&error) {
            self.0.push(error);
        }
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        for error in other.0 {
            self.add(error.field, error.rule);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn has(&self, field: Field, rule: Rule) -> bool {
        self.0.contains(&ValidationError::new(field, rule))
    }

    /// True when any rule failed on `field`.
    pub fn on(&self, field: Field) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Invalid image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to hash password: {0}")]
    PasswordHash(String),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl AccountError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            AccountError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type AccountResult<T> = Result<T, AccountError>;
