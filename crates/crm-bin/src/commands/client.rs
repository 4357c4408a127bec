// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `crm client ...`

use crm_service::{ClientChanges, NewClient, Services};

use crate::cli::{Cli, ClientCommand};
use crate::error::BinResult;
use crate::output::{print_record, print_records};

/// Runs a client subcommand.
pub fn run(cli: &Cli, services: &Services, cmd: ClientCommand) -> BinResult<()> {
    let clients = &services.clients;
    match cmd {
        ClientCommand::List => print_records(cli.output, &clients.list()?),
        ClientCommand::Show { id } => print_record(cli.output, &clients.get(id)?),
        ClientCommand::Create {
            full_name,
            email,
            phone,
            company,
        } => {
            let created = clients.create(NewClient {
                full_name,
                email,
                phone,
                company,
            })?;
            print_record(cli.output, &created)
        }
        ClientCommand::Update {
            id,
            full_name,
            email,
            phone,
            company,
        } => {
            let changes = ClientChanges {
                full_name,
                email,
                phone,
                company,
            };
            print_record(cli.output, &clients.update(id, changes)?)
        }
        ClientCommand::Delete { id } => print_record(cli.output, &clients.delete(id)?),
    }
}
