use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tweetbox::{seed_demo_data, Accounts, AccountsConfig, MemoryStore};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AccountsConfig::from_env();
    tracing::info!(upload_root = %config.upload_root, thumbnail_size = config.thumbnail_size, "starting");

    let accounts = Accounts::with_config(Arc::new(MemoryStore::new()), config);
    seed_demo_data(&accounts)?;

    for user in accounts.list()? {
        let tweets = accounts.tweets_of(user.id)?;
        let favorites = accounts.favorite_tweets_of(user.id)?;
        let timeline = serde_json::json!({
            "user": user,
            "tweets": tweets,
            "favorites": favorites,
        });
        println!("{}", serde_json::to_string_pretty(&timeline)?);
    }

    Ok(())
}
