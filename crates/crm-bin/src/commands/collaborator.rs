// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `crm collaborator ...`

use tracing::info;

use crm_service::{CollaboratorChanges, NewCollaborator, Services};

use crate::cli::{Cli, CollaboratorCommand};
use crate::commands::secret_or_prompt;
use crate::error::BinResult;
use crate::output::{collaborator_view, print_record, print_records};

/// Runs a collaborator subcommand.
pub fn run(cli: &Cli, services: &Services, cmd: CollaboratorCommand) -> BinResult<()> {
    let collaborators = &services.collaborators;
    match cmd {
        CollaboratorCommand::List => {
            let views: Vec<_> = collaborators.list()?.iter().map(collaborator_view).collect();
            print_records(cli.output, &views)
        }
        CollaboratorCommand::Show { id } => {
            print_record(cli.output, &collaborator_view(&collaborators.get(id)?))
        }
        CollaboratorCommand::Create {
            username,
            password,
            first_name,
            last_name,
            email,
            role,
        } => {
            let password = secret_or_prompt(password, "Password")?;
            let created = collaborators.create(NewCollaborator {
                username,
                password,
                first_name,
                last_name,
                email,
                role,
            })?;
            print_record(cli.output, &collaborator_view(&created))
        }
        CollaboratorCommand::Update {
            id,
            first_name,
            last_name,
            email,
        } => {
            let updated = collaborators.update(
                id,
                CollaboratorChanges {
                    first_name,
                    last_name,
                    email,
                },
            )?;
            print_record(cli.output, &collaborator_view(&updated))
        }
        CollaboratorCommand::Delete { id } => {
            let me = services.users.whoami().ok().map(|i| i.collaborator_id);
            let removed = collaborators.delete(id)?;
            if me == Some(removed.id) {
                info!(collaborator = removed.id, "Deleted own account, ending session");
                services.users.logout()?;
            }
            print_record(cli.output, &collaborator_view(&removed))
        }
        CollaboratorCommand::ModifyRole { id, role } => {
            print_record(cli.output, &collaborator_view(&collaborators.modify_role(id, role)?))
        }
    }
}
