use std::io::{self, Write};

use anyhow::{Result, bail};
use clap::Args;
use client::forms::{FormController, LoginField, LoginForm, SignupField, SignupForm, SignupRules};
use rpassword::prompt_password;
use tracing::info;

use super::{App, conclude};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username or email address
    #[arg(long, short)]
    pub user: Option<String>,

    /// Password; prompted for when omitted
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    #[arg(long, short)]
    pub username: Option<String>,

    #[arg(long, short)]
    pub email: Option<String>,

    /// Password; prompted for (twice) when omitted
    #[arg(long)]
    pub password: Option<String>,

    /// Only check required fields and the email format
    #[arg(long)]
    pub basic: bool,
}

pub async fn login(app: &App, args: LoginArgs) -> Result<()> {
    let user = match args.user {
        Some(user) => user,
        None => prompt("Username or email: ")?,
    };
    let password = match args.password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };

    let mut form = LoginForm::new();
    form.on_field_change(LoginField::UsernameOrEmail, user);
    form.on_field_change(LoginField::Password, password);

    let submitted = form.submit(&app.api).await;
    conclude(&mut form, submitted, app.redirect_delay()).await?;

    if let Some(user) = app.api.session().current_user() {
        println!("Logged in as {} <{}>", user.username, user.email);
    }
    Ok(())
}

pub async fn signup(app: &App, args: SignupArgs) -> Result<()> {
    let rules = if args.basic {
        SignupRules::basic()
    } else {
        SignupRules::default()
    };

    let username = match args.username {
        Some(username) => username,
        None => prompt("Username: ")?,
    };
    let email = match args.email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let (password, confirmation) = match args.password {
        Some(password) => (password.clone(), password),
        None => {
            let password = prompt_password("Password: ")?;
            let confirmation = if rules.require_confirmation {
                prompt_password("Confirm password: ")?
            } else {
                password.clone()
            };
            (password, confirmation)
        }
    };

    let mut form = SignupForm::new(rules);
    form.on_field_change(SignupField::Username, username);
    form.on_field_change(SignupField::Email, email);
    form.on_field_change(SignupField::Password, password);
    form.on_field_change(SignupField::ConfirmPassword, confirmation);

    let submitted = form.submit(&app.api).await;
    conclude(&mut form, submitted, app.redirect_delay()).await
}

pub fn logout(app: &App) {
    let session = app.api.session();
    let user = session.current_user();
    session.logout();
    match user {
        Some(user) => {
            info!(username = %user.username, "logged out");
            println!("Logged out {}.", user.username);
        }
        None => println!("No active session."),
    }
}

pub fn whoami(app: &App) -> Result<()> {
    let Some(user) = app.api.session().current_user() else {
        bail!("Not logged in. Run `prok login`.");
    };
    println!("{} <{}> (id {})", user.username, user.email, user.id);
    println!("API: {}", app.api.base_url());
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}
