// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - account: `login`, `logout`, `whoami`, `password`, `username`, `users`
//! - records: `collaborator`, `client`, `contract`, `event`
//! - setup: `init`, `validate`, `version`

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crm_core::{RecordId, Role};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// CRM - customers, contracts and events from the terminal
#[derive(Parser, Debug)]
#[command(
    name = "crm",
    author = "Sylvex <contact@sylvex.io>",
    version = crm_core::VERSION,
    about = "Customer relationship management for event organisers",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "crm.toml",
        env = "CRM_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); defaults to the config's `log_level`
    #[arg(short, long, env = "CRM_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "CRM_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Output format for records
    #[arg(short, long, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and store a session
    Login(LoginArgs),

    /// Delete the stored session
    Logout,

    /// Show the logged-in collaborator
    Whoami,

    /// Change your password
    Password(PasswordArgs),

    /// Change your username
    Username(UsernameArgs),

    /// List every account (management)
    Users,

    /// Create the first management account of an empty database
    Init(InitArgs),

    /// Validate the configuration file
    Validate,

    /// Show version information
    Version,

    /// Manage collaborators
    #[command(subcommand)]
    Collaborator(CollaboratorCommand),

    /// Manage clients
    #[command(subcommand)]
    Client(ClientCommand),

    /// Manage contracts
    #[command(subcommand)]
    Contract(ContractCommand),

    /// Manage events
    #[command(subcommand)]
    Event(EventCommand),
}

// =============================================================================
// Account Arguments
// =============================================================================

/// Arguments for the `login` command.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Username
    pub username: String,

    /// Password (read from stdin when omitted)
    #[arg(short, long, env = "CRM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for the `password` command.
#[derive(Args, Debug, Clone)]
pub struct PasswordArgs {
    /// Current password (read from stdin when omitted)
    #[arg(long)]
    pub current: Option<String>,

    /// New password (read from stdin when omitted)
    #[arg(long)]
    pub new: Option<String>,
}

/// Arguments for the `username` command.
#[derive(Args, Debug, Clone)]
pub struct UsernameArgs {
    /// New username
    pub username: String,
}

/// Arguments for the `init` command.
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Username
    #[arg(long)]
    pub username: String,

    /// Password (read from stdin when omitted)
    #[arg(long)]
    pub password: Option<String>,

    /// First name
    #[arg(long)]
    pub first_name: String,

    /// Last name
    #[arg(long)]
    pub last_name: String,

    /// Email
    #[arg(long)]
    pub email: String,
}

// =============================================================================
// Record Commands
// =============================================================================

/// `crm collaborator ...`
#[derive(Subcommand, Debug, Clone)]
pub enum CollaboratorCommand {
    /// List collaborators
    List,
    /// Show one collaborator
    Show {
        /// Collaborator id
        id: RecordId,
    },
    /// Create a collaborator (management)
    Create {
        /// Username
        #[arg(long)]
        username: String,
        /// Initial password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
        /// First name
        #[arg(long)]
        first_name: String,
        /// Last name
        #[arg(long)]
        last_name: String,
        /// Email
        #[arg(long)]
        email: String,
        /// Role name or code
        #[arg(long, value_parser = parse_role)]
        role: Role,
    },
    /// Update a profile
    Update {
        /// Collaborator id
        id: RecordId,
        /// First name
        #[arg(long)]
        first_name: Option<String>,
        /// Last name
        #[arg(long)]
        last_name: Option<String>,
        /// Email
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a collaborator
    Delete {
        /// Collaborator id
        id: RecordId,
    },
    /// Change a collaborator's role (management)
    #[command(name = "modify-role")]
    ModifyRole {
        /// Collaborator id
        id: RecordId,
        /// Role name or code
        #[arg(value_parser = parse_role)]
        role: Role,
    },
}

/// `crm client ...`
#[derive(Subcommand, Debug, Clone)]
pub enum ClientCommand {
    /// List clients
    List,
    /// Show one client
    Show {
        /// Client id
        id: RecordId,
    },
    /// Create a client you are in charge of (sales)
    Create {
        /// Contact name
        #[arg(long)]
        full_name: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Contact phone
        #[arg(long, default_value = "")]
        phone: String,
        /// Company name
        #[arg(long)]
        company: String,
    },
    /// Update a client
    Update {
        /// Client id
        id: RecordId,
        /// Contact name
        #[arg(long)]
        full_name: Option<String>,
        /// Contact email
        #[arg(long)]
        email: Option<String>,
        /// Contact phone
        #[arg(long)]
        phone: Option<String>,
        /// Company name
        #[arg(long)]
        company: Option<String>,
    },
    /// Delete a client with its contracts and events
    Delete {
        /// Client id
        id: RecordId,
    },
}

/// `crm contract ...`
#[derive(Subcommand, Debug, Clone)]
pub enum ContractCommand {
    /// List contracts
    List,
    /// Show one contract
    Show {
        /// Contract id
        id: RecordId,
    },
    /// Create a contract (management)
    Create {
        /// Client id
        #[arg(long)]
        client: RecordId,
        /// Total amount
        #[arg(long)]
        total: f64,
        /// Amount still due (defaults to the total)
        #[arg(long)]
        remaining: Option<f64>,
        /// Already signed
        #[arg(long)]
        signed: bool,
    },
    /// Delete a contract with its events
    Delete {
        /// Contract id
        id: RecordId,
    },
    /// Mark a contract as signed
    Sign {
        /// Contract id
        id: RecordId,
    },
    /// Change the total amount, keeping what was paid
    #[command(name = "modify-total")]
    ModifyTotal {
        /// Contract id
        id: RecordId,
        /// New total amount
        total: f64,
    },
    /// Record a payment
    Pay {
        /// Contract id
        id: RecordId,
        /// Amount paid
        amount: f64,
    },
}

/// `crm event ...`
#[derive(Subcommand, Debug, Clone)]
pub enum EventCommand {
    /// List events
    List,
    /// Show one event
    Show {
        /// Event id
        id: RecordId,
    },
    /// Create an event under a signed contract (sales)
    Create {
        /// Contract id
        #[arg(long)]
        contract: RecordId,
        /// Event name
        #[arg(long)]
        name: String,
        /// Location
        #[arg(long, default_value = "")]
        location: String,
        /// Expected attendees
        #[arg(long, default_value = "0")]
        attendees: u32,
        /// Start time (RFC 3339, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD")
        #[arg(long, value_parser = parse_date)]
        start: DateTime<Utc>,
        /// End time
        #[arg(long, value_parser = parse_date)]
        end: DateTime<Utc>,
        /// Notes
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Update an event
    Update {
        /// Event id
        id: RecordId,
        /// Event name
        #[arg(long)]
        name: Option<String>,
        /// Location
        #[arg(long)]
        location: Option<String>,
        /// Expected attendees
        #[arg(long)]
        attendees: Option<u32>,
        /// Start time
        #[arg(long, value_parser = parse_date)]
        start: Option<DateTime<Utc>>,
        /// End time
        #[arg(long, value_parser = parse_date)]
        end: Option<DateTime<Utc>>,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Assign or clear the support collaborator (management)
    #[command(name = "modify-support")]
    ModifySupport {
        /// Event id
        id: RecordId,
        /// Support collaborator id
        #[arg(required_unless_present = "clear")]
        support: Option<RecordId>,
        /// Remove the current support collaborator
        #[arg(long, conflicts_with = "support")]
        clear: bool,
    },
    /// Delete an event
    Delete {
        /// Event id
        id: RecordId,
    },
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Value Parsers
// =============================================================================

fn parse_role(s: &str) -> Result<Role, String> {
    Role::parse(s).map_err(|e| e.to_string())
}

fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Ok(dt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("'{}' is not a date", s))
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective log level: flags first, then the configured level, then `warn`.
    pub fn effective_log_level<'a>(&'a self, configured: Option<&'a str>) -> &'a str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().or(configured).unwrap_or("warn")
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["crm", "whoami"]);
        assert_eq!(cli.config, PathBuf::from("crm.toml"));
        assert_eq!(cli.effective_log_level(None), "warn");
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(matches!(cli.command, Commands::Whoami));
    }

    #[test]
    fn test_login_command() {
        let cli = Cli::parse_from(["crm", "login", "alice", "-p", "secret123"]);
        if let Commands::Login(args) = cli.command {
            assert_eq!(args.username, "alice");
            assert_eq!(args.password.as_deref(), Some("secret123"));
        } else {
            panic!("Expected Login command");
        }
    }

    #[test]
    fn test_quiet_and_verbose() {
        assert_eq!(Cli::parse_from(["crm", "-q", "logout"]).effective_log_level(None), "error");
        assert_eq!(Cli::parse_from(["crm", "-v", "logout"]).effective_log_level(None), "debug");
    }

    #[test]
    fn test_configured_log_level() {
        let cli = Cli::parse_from(["crm", "logout"]);
        assert_eq!(cli.effective_log_level(Some("info")), "info");

        let cli = Cli::parse_from(["crm", "-l", "trace", "logout"]);
        assert_eq!(cli.effective_log_level(Some("info")), "trace");
    }

    #[test]
    fn test_collaborator_role() {
        let cli = Cli::parse_from(["crm", "collaborator", "modify-role", "4", "support"]);
        if let Commands::Collaborator(CollaboratorCommand::ModifyRole { id, role }) = cli.command {
            assert_eq!(id, 4);
            assert_eq!(role, Role::Support);
        } else {
            panic!("Expected ModifyRole command");
        }

        assert!(Cli::try_parse_from(["crm", "collaborator", "modify-role", "4", "boss"]).is_err());
    }

    #[test]
    fn test_modify_support_needs_target() {
        assert!(Cli::try_parse_from(["crm", "event", "modify-support", "1"]).is_err());
        let cli = Cli::parse_from(["crm", "event", "modify-support", "1", "--clear"]);
        assert!(matches!(
            cli.command,
            Commands::Event(EventCommand::ModifySupport { support: None, clear: true, .. })
        ));
    }

    #[test]
    fn test_parse_date() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 1, 18, 30, 0).unwrap();
        assert_eq!(parse_date("2025-06-01T18:30:00Z").unwrap(), expected);
        assert_eq!(parse_date("2025-06-01 18:30").unwrap(), expected);
        assert_eq!(
            parse_date("2025-06-01").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
        );
        assert!(parse_date("June 1st").is_err());
    }
}
