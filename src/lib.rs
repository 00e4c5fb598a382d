pub mod config;
pub mod core;
pub mod favorites;
pub mod models;
pub mod profile_image;
pub mod tweets;
pub mod users;
pub mod validation;

pub use crate::config::AccountsConfig;
pub use crate::core::db::{reset_data, seed_demo_data};
pub use crate::core::errors::{AccountError, AccountResult, Field, Rule, ValidationError, ValidationErrors};
pub use crate::core::store::{open_default_store, KvStore, MemoryStore};
pub use crate::models::{Favorite, NewTweet, NewUserAccount, ProfileImageUrls, Tweet, UserAccount};
pub use crate::users::Accounts;
