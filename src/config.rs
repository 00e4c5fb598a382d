pub const MIN_NAME_LENGTH: usize = 4;
pub const MAX_NAME_LENGTH: usize = 40;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 12;
pub const MAX_TWEET_LENGTH: usize = 140;

pub const DEFAULT_UPLOAD_ROOT: &str = "/uploads";
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 50;
pub const THUMBNAIL_PREFIX: &str = "thumb_";

// === Store keys ===
pub const USERS_LIST_KEY: &str = "users_list";
pub const TWEETS_LIST_KEY: &str = "tweets_list";
pub const USERS_SEQ: &str = "users";
pub const TWEETS_SEQ: &str = "tweets";

pub fn seq_key(kind: &str) -> String {
    format!("seq:{}", kind)
}

pub fn user_key(id: u64) -> String {
    format!("user:{}", id)
}

pub fn user_name_key(name: &str) -> String {
    format!("user_name:{}", name)
}

pub fn tweet_key(id: u64) -> String {
    format!("tweet:{}", id)
}

pub fn tweets_of_key(user_id: u64) -> String {
    format!("tweets_of:{}", user_id)
}

pub fn favorites_key(user_id: u64) -> String {
    format!("favorites:{}", user_id)
}

pub fn upload_key(path: &str) -> String {
    format!("upload:{}", path)
}

// === Env ===
pub fn upload_root() -> String {
    std::env::var("TWEETBOX_UPLOAD_ROOT")
        .ok()
        .map(|v| v.trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_UPLOAD_ROOT.to_string())
}

pub fn thumbnail_size() -> u32 {
    std::env::var("TWEETBOX_THUMBNAIL_SIZE")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_THUMBNAIL_SIZE)
}

/// Settings an [`Accounts`](crate::users::Accounts) handle is built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountsConfig {
    /// Public prefix of every stored upload, without a trailing slash.
    pub upload_root: String,
    /// Bounding box, in pixels, of generated profile thumbnails.
    pub thumbnail_size: u32,
}

impl AccountsConfig {
    pub fn from_env() -> Self {
        Self {
            upload_root: upload_root(),
            thumbnail_size: thumbnail_size(),
        }
    }
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            upload_root: DEFAULT_UPLOAD_ROOT.to_string(),
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
        }
    }
}
