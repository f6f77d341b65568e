use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use client::{
    Route,
    forms::{
        AvatarForm, CompleteProfileForm, EducationField, ExperienceField, FormController,
        PROFILE_LOAD_FAILED, ProfileDraft, ProfileEditForm, ProfileField, resolve,
    },
};
use colored::Colorize;
use shared::models::{EducationItem, ExperienceItem};
use tracing::warn;

use super::{App, SESSION_EXPIRED, conclude, read_attachment, submission_error};
use crate::views::profile::render_profile;

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show your profile
    Show,
    /// Change profile fields and save the whole profile
    Edit(ProfileEditArgs),
    /// Fill in a new account's profile
    Complete(ProfileFieldArgs),
    /// Upload a new profile photo (JPG, PNG or GIF, up to 5MB)
    Avatar {
        /// Image file to upload
        path: PathBuf,
    },
}

/// Scalar profile fields. Only the ones given are changed.
#[derive(Args, Debug, Default)]
pub struct ProfileFieldArgs {
    #[arg(long)]
    pub name: Option<String>,

    /// Professional title
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Professional summary
    #[arg(long)]
    pub bio: Option<String>,

    /// Comma-separated skills
    #[arg(long)]
    pub skills: Option<String>,

    #[arg(long)]
    pub contact_email: Option<String>,

    #[arg(long)]
    pub contact_phone: Option<String>,

    #[arg(long)]
    pub contact_location: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ProfileEditArgs {
    #[command(flatten)]
    pub fields: ProfileFieldArgs,

    /// Add an education entry: "INSTITUTION|DEGREE|PERIOD"
    #[arg(long, value_name = "ENTRY")]
    pub add_education: Vec<String>,

    /// Remove the education entry at this position (1-based)
    #[arg(long, value_name = "N")]
    pub remove_education: Vec<usize>,

    /// Add an experience entry: "COMPANY|ROLE|PERIOD|DESCRIPTION"
    #[arg(long, value_name = "ENTRY")]
    pub add_experience: Vec<String>,

    /// Remove the experience entry at this position (1-based)
    #[arg(long, value_name = "N")]
    pub remove_experience: Vec<usize>,
}

pub async fn run(app: &App, command: ProfileCommands) -> Result<()> {
    match command {
        ProfileCommands::Show => {
            app.require(Route::Profile)?;
            show(app).await
        }
        ProfileCommands::Edit(args) => {
            app.require(Route::ProfileEdit)?;
            edit(app, args).await
        }
        ProfileCommands::Complete(fields) => {
            app.require(Route::CompleteProfile)?;
            complete(app, fields).await
        }
        ProfileCommands::Avatar { path } => {
            app.require(Route::Profile)?;
            avatar(app, &path).await
        }
    }
}

async fn show(app: &App) -> Result<()> {
    let profile =
        resolve(app.api.get_profile().await, PROFILE_LOAD_FAILED).map_err(submission_error)?;

    let avatar_url = profile
        .avatar()
        .and_then(|filename| app.api.avatar_url(filename).ok());
    print!("{}", render_profile(&profile, avatar_url.as_ref()));

    if profile.is_blank() {
        println!(
            "\n{}",
            "Your profile is incomplete. Run `prok profile complete`.".yellow()
        );
    }
    Ok(())
}

async fn edit(app: &App, args: ProfileEditArgs) -> Result<()> {
    let mut form = ProfileEditForm::load(&app.api).await;
    check_loaded(form.draft())?;

    apply_fields(&mut form, args.fields);
    let draft = form.draft_mut();
    remove_entries(&args.remove_education, draft.education().len(), |index| {
        draft.remove_education(index);
    })?;
    for entry in &args.add_education {
        add_education(draft, entry);
    }
    remove_entries(&args.remove_experience, draft.experience().len(), |index| {
        draft.remove_experience(index);
    })?;
    for entry in &args.add_experience {
        add_experience(draft, entry);
    }

    let submitted = form.submit(&app.api).await;
    conclude(&mut form, submitted, app.redirect_delay()).await
}

async fn complete(app: &App, fields: ProfileFieldArgs) -> Result<()> {
    let mut form = CompleteProfileForm::load(&app.api).await;
    check_loaded(form.draft())?;

    apply_fields(&mut form, fields);

    let submitted = form.submit(&app.api).await;
    conclude(&mut form, submitted, app.redirect_delay()).await
}

async fn avatar(app: &App, path: &Path) -> Result<()> {
    let file = read_attachment(path)?;
    let mut form = AvatarForm::default();
    form.select(file);

    let submitted = form.submit(&app.api).await;
    conclude(&mut form, submitted, app.redirect_delay()).await?;

    let url = app
        .api
        .avatar_url(form.avatar())
        .context("server returned an unusable filename")?;
    println!("Photo: {url}");
    Ok(())
}

/// A draft that could not be fetched either needs a new session or starts
/// empty with the load error showing.
fn check_loaded(draft: &ProfileDraft) -> Result<()> {
    if draft.state().navigation() == Some(Route::Login) {
        bail!(SESSION_EXPIRED);
    }
    if let Some(message) = draft.state().api_error() {
        warn!(%message, "profile did not load");
        eprintln!("{}", format!("{message}; starting from an empty profile").yellow());
    }
    Ok(())
}

fn apply_fields<C>(form: &mut C, fields: ProfileFieldArgs)
where
    C: FormController<Field = ProfileField>,
{
    let changes = [
        (ProfileField::Name, fields.name),
        (ProfileField::Title, fields.title),
        (ProfileField::Location, fields.location),
        (ProfileField::Bio, fields.bio),
        (ProfileField::Skills, fields.skills),
        (ProfileField::ContactEmail, fields.contact_email),
        (ProfileField::ContactPhone, fields.contact_phone),
        (ProfileField::ContactLocation, fields.contact_location),
    ];
    for (field, value) in changes {
        if let Some(value) = value {
            form.on_field_change(field, value);
        }
    }
}

/// Remove 1-based `positions`, highest first so earlier removals do not shift
/// later ones.
fn remove_entries(positions: &[usize], len: usize, mut remove: impl FnMut(usize)) -> Result<()> {
    let mut indices = Vec::with_capacity(positions.len());
    for &position in positions {
        match position.checked_sub(1).filter(|index| *index < len) {
            Some(index) => indices.push(index),
            None => bail!("no entry at position {position}; there are {len}"),
        }
    }
    indices.sort_unstable();
    indices.dedup();
    for index in indices.into_iter().rev() {
        remove(index);
    }
    Ok(())
}

fn split_entry(entry: &str) -> Vec<&str> {
    entry.split('|').map(str::trim).collect()
}

/// Fill the trailing blank entry when there is one, otherwise append.
fn add_education(draft: &mut ProfileDraft, entry: &str) {
    if draft.education().last().is_none_or(|last| *last != EducationItem::default()) {
        draft.add_education();
    }
    let index = draft.education().len() - 1;
    let parts = split_entry(entry);
    let fields = [
        EducationField::Institution,
        EducationField::Degree,
        EducationField::Period,
    ];
    for (field, value) in fields.into_iter().zip(parts) {
        draft.update_education(index, field, value);
    }
}

fn add_experience(draft: &mut ProfileDraft, entry: &str) {
    if draft.experience().last().is_none_or(|last| *last != ExperienceItem::default()) {
        draft.add_experience();
    }
    let index = draft.experience().len() - 1;
    let parts = split_entry(entry);
    let fields = [
        ExperienceField::Company,
        ExperienceField::Role,
        ExperienceField::Period,
        ExperienceField::Description,
    ];
    for (field, value) in fields.into_iter().zip(parts) {
        draft.update_experience(index, field, value);
    }
}
