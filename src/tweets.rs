use std::sync::OnceLock;

use ammonia::Builder;
use html_escape::{decode_html_entities, encode_double_quoted_attribute};
use regex::Regex;
use tracing::info;

use crate::config::*;
use crate::core::errors::{AccountError, AccountResult, Field, Rule, ValidationErrors};
use crate::core::helpers::now;
use crate::core::store::{next_id, KvStore};
use crate::models::{NewTweet, Tweet};
use crate::users::Accounts;

fn url_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"https?://[^\s<]+").expect("Regex should compile"))
}

/// Strip markup from tweet text and turn bare http(s) URLs into links.
pub fn filter_tweet_content(content: &str) -> String {
    let clean = Builder::default()
        .tags(std::collections::HashSet::new())
        .clean(content)
        .to_string();

    url_regex()
        .replace_all(&clean, |caps: &regex::Captures| {
            let url = &caps[0];
            // the cleaner already escaped the text; undo it before escaping for the attribute
            let raw_url = decode_html_entities(url);
            let escaped_url = encode_double_quoted_attribute(&raw_url);
            format!(r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#, escaped_url, url)
        })
        .to_string()
}

/// Newest first; equal timestamps fall back to the higher id.
pub fn sort_newest_first(tweets: &mut [Tweet]) {
    tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

impl<S: KvStore> Accounts<S> {
    pub fn create_tweet(&self, new_tweet: NewTweet) -> AccountResult<Tweet> {
        new_tweet.validate_attributes()?;

        let content = filter_tweet_content(&new_tweet.content);
        if content.trim().is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add(Field::Content, Rule::Blank);
            return Err(errors.into());
        }

        if let Some(user_id) = new_tweet.user_id {
            self.require_user(user_id)?;
        }

        let id = next_id(self.store(), TWEETS_SEQ)?;
        let tweet = Tweet {
            id,
            user_id: new_tweet.user_id,
            content,
            created_at: now(),
        };

        self.store.set_json(&tweet_key(id), &tweet)?;

        let mut all: Vec<u64> = self.store.get_json(TWEETS_LIST_KEY)?.unwrap_or_default();
        all.push(id);
        self.store.set_json(TWEETS_LIST_KEY, &all)?;

        if let Some(user_id) = tweet.user_id {
            let key = tweets_of_key(user_id);
            let mut owned: Vec<u64> = self.store.get_json(&key)?.unwrap_or_default();
            owned.push(id);
            self.store.set_json(&key, &owned)?;
        }

        info!(tweet_id = id, user_id = ?tweet.user_id, "tweet created");
        Ok(tweet)
    }

    pub fn find_tweet(&self, id: u64) -> AccountResult<Option<Tweet>> {
        Ok(self.store.get_json(&tweet_key(id))?)
    }

    pub(crate) fn require_tweet(&self, id: u64) -> AccountResult<Tweet> {
        self.find_tweet(id)?
            .ok_or_else(|| AccountError::NotFound(format!("Tweet {} not found", id)))
    }

    /// Tweets owned by `user_id`, newest first.
    pub fn tweets_of(&self, user_id: u64) -> AccountResult<Vec<Tweet>> {
        self.require_user(user_id)?;

        let ids: Vec<u64> = self.store.get_json(&tweets_of_key(user_id))?.unwrap_or_default();
        let mut tweets = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(tweet) = self.find_tweet(id)? {
                tweets.push(tweet);
            }
        }

        sort_newest_first(&mut tweets);
        Ok(tweets)
    }
}
