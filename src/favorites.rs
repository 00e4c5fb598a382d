use tracing::{debug, info};

use crate::config::favorites_key;
use crate::core::errors::AccountResult;
use crate::core::helpers::now;
use crate::core::store::KvStore;
use crate::models::{Favorite, Tweet};
use crate::users::Accounts;

/// Record the favorite unless it already exists. Returns whether it was added.
pub fn add_favorite<S: KvStore>(store: &S, user_id: u64, tweet_id: u64) -> anyhow::Result<bool> {
    let key = favorites_key(user_id);
    let mut favorites: Vec<Favorite> = store.get_json(&key)?.unwrap_or_default();

    if favorites.iter().any(|f| f.tweet_id == tweet_id) {
        return Ok(false);
    }

    favorites.push(Favorite {
        user_id,
        tweet_id,
        created_at: now(),
    });
    store.set_json(&key, &favorites)?;

    Ok(true)
}

pub fn remove_favorite<S: KvStore>(store: &S, user_id: u64, tweet_id: u64) -> anyhow::Result<bool> {
    let key = favorites_key(user_id);
    let mut favorites: Vec<Favorite> = store.get_json(&key)?.unwrap_or_default();

    let before = favorites.len();
    favorites.retain(|f| f.tweet_id != tweet_id);
    if favorites.len() == before {
        return Ok(false);
    }

    store.set_json(&key, &favorites)?;
    Ok(true)
}

/// Favorites of `user_id` in the order they were added.
pub fn get_favorites<S: KvStore>(store: &S, user_id: u64) -> anyhow::Result<Vec<Favorite>> {
    Ok(store.get_json(&favorites_key(user_id))?.unwrap_or_default())
}

impl<S: KvStore> Accounts<S> {
    pub fn add_to_favorites(&self, user_id: u64, tweet_id: u64) -> AccountResult<()> {
        self.require_user(user_id)?;
        self.require_tweet(tweet_id)?;

        if add_favorite(self.store(), user_id, tweet_id)? {
            info!(user_id, tweet_id, "tweet favorited");
        } else {
            debug!(user_id, tweet_id, "tweet already favorited");
        }
        Ok(())
    }

    pub fn remove_from_favorites(&self, user_id: u64, tweet_id: u64) -> AccountResult<bool> {
        self.require_user(user_id)?;
        Ok(remove_favorite(self.store(), user_id, tweet_id)?)
    }

    pub fn has_favorited(&self, user_id: u64, tweet_id: u64) -> AccountResult<bool> {
        self.require_user(user_id)?;
        Ok(get_favorites(self.store(), user_id)?
            .iter()
            .any(|f| f.tweet_id == tweet_id))
    }

    /// Favorited tweets, most recently favorited first.
    pub fn favorite_tweets_of(&self, user_id: u64) -> AccountResult<Vec<Tweet>> {
        self.require_user(user_id)?;

        let mut tweets = Vec::new();
        for favorite in get_favorites(self.store(), user_id)?.iter().rev() {
            if let Some(tweet) = self.find_tweet(favorite.tweet_id)? {
                tweets.push(tweet);
            }
        }
        Ok(tweets)
    }
}
