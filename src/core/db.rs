use tracing::info;

use crate::config::*;
use crate::core::errors::AccountResult;
use crate::core::store::KvStore;
use crate::models::{NewTweet, NewUserAccount, Tweet, UserAccount};
use crate::profile_image::profile_image_urls;
use crate::users::Accounts;

const DEMO_USERS: [(&str, &str, &str); 3] = [
    ("tester", "123456", "tester@example.com"),
    ("alice", "alice123", "alice@example.com"),
    ("bob_b", "bobbob", "bob@example.com"),
];

fn demo_tweets(name: &str) -> &'static [&'static str] {
    match name {
        "tester" => &["This is my first tweet!"],
        "alice" => &[
            "Welcome to my timeline! Excited to share thoughts here.",
            "Just finished an amazing project. Feeling productive today!",
        ],
        _ => &["Hey everyone! Just joined, looking forward to connecting with you all."],
    }
}

fn ensure_user<S: KvStore>(
    accounts: &Accounts<S>,
    name: &str,
    password: &str,
    email: &str,
) -> AccountResult<(UserAccount, bool)> {
    if let Some(existing) = accounts.find_by_name(name)? {
        return Ok((existing, false));
    }
    let user = accounts.create(NewUserAccount::new(name, password).with_email(email))?;
    Ok((user, true))
}

/// Populate demo accounts, their tweets, and one favorite. Safe to run twice.
pub fn seed_demo_data<S: KvStore>(accounts: &Accounts<S>) -> AccountResult<()> {
    let mut created = Vec::new();

    for (name, password, email) in DEMO_USERS {
        let (user, is_new) = ensure_user(accounts, name, password, email)?;
        if is_new {
            for content in demo_tweets(name) {
                accounts.create_tweet(NewTweet::new(*content).by(user.id))?;
            }
        }
        created.push(user);
    }

    // tester favorites bob's newest tweet
    if let (Some(tester), Some(bob)) = (created.first(), created.last()) {
        let bob_tweets: Vec<Tweet> = accounts.tweets_of(bob.id)?;
        if let Some(tweet) = bob_tweets.first() {
            accounts.add_to_favorites(tester.id, tweet.id)?;
        }
    }

    info!(accounts = created.len(), "demo data ready");
    Ok(())
}

/// Delete every record and upload this crate owns. `config` locates the uploads.
pub fn reset_data<S: KvStore>(store: &S, config: &AccountsConfig) -> anyhow::Result<()> {
    let users: Vec<u64> = store.get_json(USERS_LIST_KEY)?.unwrap_or_default();

    for id in &users {
        if let Some(user) = store.get_json::<UserAccount>(&user_key(*id))? {
            store.delete(&user_name_key(&user.name))?;
            if let Some(filename) = user.profile_image.as_deref() {
                let urls = profile_image_urls(&config.upload_root, *id, filename);
                store.delete(&upload_key(&urls.original_url))?;
                store.delete(&upload_key(&urls.thumbnail_url))?;
            }
        }
        store.delete(&user_key(*id))?;
        store.delete(&tweets_of_key(*id))?;
        store.delete(&favorites_key(*id))?;
    }

    let tweets: Vec<u64> = store.get_json(TWEETS_LIST_KEY)?.unwrap_or_default();
    for id in tweets {
        store.delete(&tweet_key(id))?;
    }

    store.delete(USERS_LIST_KEY)?;
    store.delete(TWEETS_LIST_KEY)?;
    store.delete(&seq_key(USERS_SEQ))?;
    store.delete(&seq_key(TWEETS_SEQ))?;

    info!(accounts = users.len(), "data reset");
    Ok(())
}
