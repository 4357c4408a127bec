// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `crm contract ...`

use crm_service::{NewContract, Services};

use crate::cli::{Cli, ContractCommand};
use crate::error::BinResult;
use crate::output::{print_record, print_records};

/// Runs a contract subcommand.
pub fn run(cli: &Cli, services: &Services, cmd: ContractCommand) -> BinResult<()> {
    let contracts = &services.contracts;
    let record = match cmd {
        ContractCommand::List => return print_records(cli.output, &contracts.list()?),
        ContractCommand::Show { id } => contracts.get(id)?,
        ContractCommand::Create {
            client,
            total,
            remaining,
            signed,
        } => contracts.create(NewContract {
            client_id: client,
            total_amount: total,
            remaining_amount: remaining,
            signed,
        })?,
        ContractCommand::Delete { id } => contracts.delete(id)?,
        ContractCommand::Sign { id } => contracts.sign(id)?,
        ContractCommand::ModifyTotal { id, total } => contracts.modify_total(id, total)?,
        ContractCommand::Pay { id, amount } => contracts.pay(id, amount)?,
    };
    print_record(cli.output, &record)
}
