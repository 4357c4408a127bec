// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.

mod account;
mod client;
mod collaborator;
mod contract;
mod event;
mod setup;

use std::io::{self, BufRead, Write};

use anyhow::Context as _;
use tracing::debug;

use crm_service::Services;

use crate::cli::{Cli, Commands};
use crate::error::{BinError, BinResult};

/// Executes the command selected on the command line.
pub fn execute(cli: &Cli) -> BinResult<()> {
    match &cli.command {
        Commands::Version => return setup::version(),
        Commands::Validate => return setup::validate(cli),
        _ => {}
    }

    let services = open_services(cli)?;
    match cli.command.clone() {
        Commands::Login(args) => account::login(&services, args),
        Commands::Logout => account::logout(&services),
        Commands::Whoami => account::whoami(cli, &services),
        Commands::Password(args) => account::password(&services, args),
        Commands::Username(args) => account::username(&services, args),
        Commands::Users => account::users(cli, &services),
        Commands::Init(args) => setup::init(cli, &services, args),
        Commands::Collaborator(cmd) => collaborator::run(cli, &services, cmd),
        Commands::Client(cmd) => client::run(cli, &services, cmd),
        Commands::Contract(cmd) => contract::run(cli, &services, cmd),
        Commands::Event(cmd) => event::run(cli, &services, cmd),
        Commands::Version | Commands::Validate => Ok(()),
    }
}

fn open_services(cli: &Cli) -> BinResult<Services> {
    let config = crm_config::load_config(&cli.config)?;
    debug!(
        data = %config.data_storage.display(),
        tokens = %config.token_storage.display(),
        "Configuration loaded"
    );
    Ok(Services::from_config(&config)?)
}

/// Returns `given`, or reads one line from stdin after printing `label`.
pub(crate) fn secret_or_prompt(given: Option<String>, label: &str) -> BinResult<String> {
    if let Some(value) = given {
        return Ok(value);
    }

    eprint!("{}: ", label);
    io::stderr().flush().context("flushing prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .with_context(|| format!("reading {}", label.to_lowercase()))?;
    non_empty(line.trim_end_matches(['\r', '\n']), label)
}

fn non_empty(value: &str, label: &str) -> BinResult<String> {
    if value.is_empty() {
        return Err(BinError::input(format!("{} must not be empty", label)));
    }
    Ok(value.to_string())
}

// =============================================================================
// Tests
// =============================================================================
