// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `crm event ...`

use crm_service::{EventChanges, NewEvent, Services};

use crate::cli::{Cli, EventCommand};
use crate::error::BinResult;
use crate::output::{print_record, print_records};

/// Runs an event subcommand.
pub fn run(cli: &Cli, services: &Services, cmd: EventCommand) -> BinResult<()> {
    let events = &services.events;
    let record = match cmd {
        EventCommand::List => return print_records(cli.output, &events.list()?),
        EventCommand::Show { id } => events.get(id)?,
        EventCommand::Create {
            contract,
            name,
            location,
            attendees,
            start,
            end,
            notes,
        } => events.create(
            contract,
            NewEvent {
                name,
                location,
                attendees,
                start_date: start,
                end_date: end,
                notes,
            },
        )?,
        EventCommand::Update {
            id,
            name,
            location,
            attendees,
            start,
            end,
            notes,
        } => events.update(
            id,
            EventChanges {
                name,
                location,
                attendees,
                start_date: start,
                end_date: end,
                notes,
            },
        )?,
        // `--clear` and a support id are mutually exclusive
        EventCommand::ModifySupport { id, support, .. } => events.modify_support(id, support)?,
        EventCommand::Delete { id } => events.delete(id)?,
    };
    print_record(cli.output, &record)
}
