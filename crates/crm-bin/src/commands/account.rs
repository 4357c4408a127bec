// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `login`, `logout`, `whoami`, `password`, `username` and `users`.

use crm_service::Services;

use crate::cli::{Cli, LoginArgs, PasswordArgs, UsernameArgs};
use crate::commands::secret_or_prompt;
use crate::error::BinResult;
use crate::output::{collaborator_view, identity_view, print_record, print_records};

/// Logs in; success is silent.
pub fn login(services: &Services, args: LoginArgs) -> BinResult<()> {
    let password = secret_or_prompt(args.password, "Password")?;
    services.users.login(&args.username, &password)?;
    Ok(())
}

/// Logs out.
pub fn logout(services: &Services) -> BinResult<()> {
    services.users.logout()?;
    Ok(())
}

/// Shows the logged-in collaborator.
pub fn whoami(cli: &Cli, services: &Services) -> BinResult<()> {
    let identity = services.users.whoami()?;
    print_record(cli.output, &identity_view(&identity))
}

/// Changes the caller's password.
pub fn password(services: &Services, args: PasswordArgs) -> BinResult<()> {
    let current = secret_or_prompt(args.current, "Current password")?;
    let new = secret_or_prompt(args.new, "New password")?;
    services.users.modify_password(&current, &new)?;
    eprintln!("Password changed");
    Ok(())
}

/// Changes the caller's username.
pub fn username(services: &Services, args: UsernameArgs) -> BinResult<()> {
    let identity = services.users.modify_username(&args.username)?;
    eprintln!("You are now {}", identity.subject);
    Ok(())
}

/// Lists every account.
pub fn users(cli: &Cli, services: &Services) -> BinResult<()> {
    let views: Vec<_> = services.users.list()?.iter().map(collaborator_view).collect();
    print_records(cli.output, &views)
}
