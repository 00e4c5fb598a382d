use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub password_hash: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Sanitized filename of the stored profile image.
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Copy safe to hand out: no password hash.
    pub fn public(&self) -> UserAccount {
        UserAccount {
            password_hash: String::new(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Tweet {
    pub id: u64,
    pub user_id: Option<u64>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Favorite {
    pub user_id: u64,
    pub tweet_id: u64,
    pub created_at: DateTime<Utc>,
}

/// Attributes for a new account. Every field is spelled out so fixtures are
/// built with struct update syntax instead of merging maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUserAccount {
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl NewUserAccount {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    pub fn with_password(self, password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..self
        }
    }

    pub fn with_email(self, email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..self
        }
    }

    pub fn with_phone(self, phone: impl Into<String>) -> Self {
        Self {
            phone: Some(phone.into()),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTweet {
    pub content: String,
    pub user_id: Option<u64>,
}

impl NewTweet {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            user_id: None,
        }
    }

    pub fn by(self, user_id: u64) -> Self {
        Self {
            user_id: Some(user_id),
            ..self
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProfileImageUrls {
    pub original_url: String,
    pub thumbnail_url: String,
}
