//! Command-line interface, parsed with clap.

mod commands;

use clap::{Parser, Subcommand};

use crate::domain::UserRoleType;

/// ACROSS observation scheduling backend
#[derive(Parser)]
#[command(name = "across")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server (default)
    #[command(alias = "daemon")]
    Serve,

    /// Apply pending database migrations
    Migrate {
        /// Roll every migration back, then re-apply them
        #[arg(long)]
        reset: bool,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create an account
    Create {
        email: String,
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        password: String,
        /// Roles to grant, e.g. `--role admin --role viewer`
        #[arg(long = "role")]
        roles: Vec<UserRoleType>,
    },

    /// List accounts with their roles
    #[command(alias = "ls")]
    List,

    /// Grant a role
    Grant { email: String, role: UserRoleType },

    /// Revoke a role
    Revoke { email: String, role: UserRoleType },

    /// Issue a new API token, replacing the current one
    Token { email: String },

    /// Issue a password-reset token to hand to the account owner
    ResetToken {
        email: String,
        /// Lifetime in seconds (defaults to security.reset_token_expiry_seconds)
        #[arg(long)]
        expires_in: Option<u64>,
    },

    /// Delete an account and its role links
    #[command(alias = "rm")]
    Delete { email: String },
}

pub use commands::*;
