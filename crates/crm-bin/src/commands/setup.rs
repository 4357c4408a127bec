// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `init`, `validate` and `version`.

use crm_core::Role;
use crm_service::{NewCollaborator, Services};

use crate::cli::{Cli, InitArgs};
use crate::commands::secret_or_prompt;
use crate::error::{BinError, BinResult};
use crate::output::{collaborator_view, print_record};

/// Creates the first management account.
pub fn init(cli: &Cli, services: &Services, args: InitArgs) -> BinResult<()> {
    let password = secret_or_prompt(args.password, "Password")?;
    let created = services.init(NewCollaborator {
        username: args.username,
        password,
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        role: Role::Management,
    })?;
    print_record(cli.output, &collaborator_view(&created))
}

/// Loads and validates the configuration without touching any data.
pub fn validate(cli: &Cli) -> BinResult<()> {
    let config = crm_config::load_config(&cli.config).map_err(|e| {
        BinError::config(format!(
            "{} is not a usable configuration: {}",
            cli.config.display(),
            e
        ))
    })?;

    let mut warnings = Vec::new();
    if !cli.config.exists() {
        warnings.push(format!(
            "{} not found, using defaults and environment",
            cli.config.display()
        ));
    }
    if config.secret_key.len() < 32 {
        warnings.push("SECRET_KEY is shorter than 32 bytes".to_string());
    }

    println!("Configuration is valid: {}", cli.config.display());
    println!("  Token storage:    {}", config.token_storage.display());
    println!("  Data storage:     {}", config.data_storage.display());
    println!("  Access lifetime:  {}s", config.access_lifetime);
    println!("  Refresh lifetime: {}s", config.refresh_lifetime);
    for warning in &warnings {
        println!("  warning: {}", warning);
    }
    Ok(())
}

/// Shows version information.
pub fn version() -> BinResult<()> {
    println!("CRM - customer relationship management");
    println!();
    println!("Version Information:");
    println!("  crm-bin:     {}", crate::VERSION);
    println!("  crm-core:    {}", crm_core::VERSION);
    println!("  crm-config:  {}", crm_config::VERSION);
    println!("  crm-auth:    {}", crm_auth::VERSION);
    println!("  crm-service: {}", crm_service::VERSION);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");
    Ok(())
}
