//! Command-line interface for matchcrm.
//!
//! Serves the site by default; the other commands work on the same store
//! directly, for operators with shell access.

mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{Gender, MaritalStatus};

/// matchcrm - Matrimonial profile catalog and admin console
#[derive(Parser)]
#[command(name = "matchcrm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config.toml (defaults to the usual lookup locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Manage published profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Review received inquiries
    Inquiry {
        #[command(subcommand)]
        command: InquiryCommands,
    },

    /// Manage the admin account
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List stored profiles
    #[command(alias = "ls")]
    List,
    /// Show one profile
    Show {
        /// Profile ID, e.g. SMB-917
        id: String,
    },
    /// Publish a new profile
    Add(ProfileArgs),
    /// Edit an existing profile; omitted fields keep their value
    Edit {
        /// Profile ID
        id: String,
        #[command(flatten)]
        fields: ProfileArgs,
    },
    /// Delete a profile
    #[command(alias = "rm")]
    Remove {
        /// Profile ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args, Default)]
pub struct ProfileArgs {
    /// Profession shown as the card title
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub age: Option<String>,
    /// Single, Divorced or Widow
    #[arg(long)]
    pub status: Option<MaritalStatus>,
    /// Male or Female
    #[arg(long)]
    pub gender: Option<Gender>,
    #[arg(long)]
    pub city: Option<String>,
    /// Image reference stored as-is (a path under the public dir or a data URI)
    #[arg(long, conflicts_with = "image_file")]
    pub image: Option<String>,
    /// Local image file, stored inline as a data URI
    #[arg(long)]
    pub image_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum InquiryCommands {
    /// List inquiries, newest first
    #[command(alias = "ls")]
    List,
    /// Delete an inquiry by id
    #[command(alias = "rm")]
    Remove {
        /// Inquiry ID (see `inquiry list`)
        id: String,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Show the admin account
    Show,
    /// Set a new admin password
    SetPassword {
        /// New password
        password: String,
    },
}

pub use commands::*;
