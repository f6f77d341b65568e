use anyhow::Result;
use clap::Args;
use client::{Route, forms::resolve};

use super::{App, submission_error};
use crate::views::feed::{filter_feed, render_feed};

const FEED_LOAD_FAILED: &str = "Failed to load posts";

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Only show posts by this user id
    #[arg(long)]
    pub user: Option<i64>,

    /// Only show posts whose text contains this, ignoring case
    #[arg(long, short)]
    pub search: Option<String>,
}

pub async fn run(app: &App, args: FeedArgs) -> Result<()> {
    app.require(Route::Feed)?;

    let outcome = match args.user {
        Some(user_id) => app.api.get_user_feed(user_id).await,
        None => app.api.get_feed().await,
    };
    let response = resolve(outcome, FEED_LOAD_FAILED).map_err(submission_error)?;

    let items = filter_feed(&response.feed, args.search.as_deref());
    let media_link = |path: &str| {
        app.api
            .asset_url(path)
            .map_or_else(|_| path.to_string(), |url| url.to_string())
    };
    print!("{}", render_feed(&items, media_link));
    Ok(())
}
