//! User CLI commands
//!
//! Registration and password recovery do not need `--user`; the other
//! commands log in as that account first.

use anyhow::Result;
use clap::Subcommand;
use zeroize::Zeroizing;

use crate::models::UserProfile;
use crate::response::Response;
use crate::validation::RegistrationDraft;

use super::CliContext;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Defaults to --user
        #[arg(long)]
        username: Option<String>,
    },

    /// Check the --user credentials
    Login,

    /// Show the --user profile
    Show,

    /// Edit the --user profile; omitted fields keep their value
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        username: Option<String>,
    },

    /// Look up an account by email (recovery step 1)
    Recover {
        #[arg(long)]
        email: String,
    },

    /// Set a new password for the account with this email (recovery step 2)
    ResetPassword {
        #[arg(long)]
        email: String,
    },
}

fn describe(profile: &UserProfile) -> String {
    format!(
        "Username: {}\nName:     {}\nEmail:    {}\nID:       {}",
        profile.username, profile.name, profile.email, profile.id
    )
}

/// New password and its confirmation; a preset password is used for both
fn new_password(ctx: &CliContext<'_>) -> Result<(Zeroizing<String>, Zeroizing<String>)> {
    if let Some(password) = &ctx.password {
        return Ok((password.clone(), password.clone()));
    }
    let password = super::prompt_password("New password: ")?;
    let confirm = super::prompt_password("Confirm password: ")?;
    Ok((password, confirm))
}

/// Handle a user command
pub fn handle_user_command(ctx: &CliContext<'_>, cmd: UserCommands) -> Result<()> {
    let engine = ctx.engine;

    match cmd {
        UserCommands::Register { name, email, username } => {
            let username = username.or_else(|| ctx.username.clone()).unwrap_or_default();
            let (password, confirm_password) = new_password(ctx)?;
            let draft = RegistrationDraft {
                name,
                email,
                username,
                password,
                confirm_password,
            };
            ctx.out.emit(engine.register(&draft), |p| {
                format!("Registered {} ({})", p.username, p.id)
            })
        }

        UserCommands::Login => {
            let profile = ctx.current_user()?;
            ctx.out.emit(Response::ok(profile), |p| {
                format!("Logged in as {}", p.username)
            })
        }

        UserCommands::Show => {
            let profile = ctx.current_user()?;
            ctx.out.emit(engine.get_user(profile.id), describe)
        }

        UserCommands::Update { name, email, username } => {
            let current = ctx.current_user()?;
            let response = engine.update_profile(
                current.id,
                name.as_deref().unwrap_or(&current.name),
                email.as_deref().unwrap_or(&current.email),
                username.as_deref().unwrap_or(&current.username),
            );
            ctx.out.emit(response, describe)
        }

        UserCommands::Recover { email } => ctx.out.emit(engine.find_user_by_email(&email), |p| {
            format!("Account found: {}", p.username)
        }),

        UserCommands::ResetPassword { email } => {
            let profile = ctx.out.require(engine.find_user_by_email(&email))?;
            let (password, confirm) = new_password(ctx)?;
            ctx.out.emit(engine.reset_password(profile.id, &password, &confirm), |_| {
                format!("Password updated for {}", profile.username)
            })
        }
    }
}
