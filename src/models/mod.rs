#[allow(clippy::module_inception)]
pub mod models;

pub use models::{Favorite, NewTweet, NewUserAccount, ProfileImageUrls, Tweet, UserAccount};
