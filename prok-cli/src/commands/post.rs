use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use client::{
    Route,
    forms::{FormController, PostCreateForm, PostField},
};

use super::{App, conclude, read_attachment};
use crate::views::{post::render_preview, render_form_errors};

#[derive(Subcommand, Debug)]
pub enum PostCommands {
    /// Publish a new post
    Create(PostCreateArgs),
}

#[derive(Args, Debug)]
pub struct PostCreateArgs {
    #[arg(long, short)]
    pub title: String,

    /// Post body; may contain HTML
    #[arg(long)]
    pub content: String,

    /// Image or video to attach (up to 10MB)
    #[arg(long, short)]
    pub media: Option<PathBuf>,

    /// Only visible to you
    #[arg(long)]
    pub private: bool,

    /// Turn comments off
    #[arg(long)]
    pub no_comments: bool,

    /// Print the preview instead of publishing
    #[arg(long)]
    pub preview: bool,
}

pub async fn run(app: &App, command: PostCommands) -> Result<()> {
    match command {
        PostCommands::Create(args) => create(app, args).await,
    }
}

async fn create(app: &App, args: PostCreateArgs) -> Result<()> {
    app.require(Route::CreatePost)?;

    let mut form = PostCreateForm::new();
    form.on_field_change(PostField::Title, args.title);
    form.on_field_change(PostField::Content, args.content);
    form.set_public(!args.private);
    form.set_allow_comments(!args.no_comments);
    if let Some(path) = args.media {
        let file = read_attachment(&path)?;
        if !form.select_media(file) {
            eprint!("{}", render_form_errors(form.state()));
            bail!("{} cannot be attached.", path.display());
        }
    }

    if args.preview {
        print!("{}", render_preview(&form.preview()));
        return Ok(());
    }

    let submitted = form.submit(&app.api).await;
    conclude(&mut form, submitted, app.redirect_delay()).await
}
