// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Entry point of the `crm` binary.

use crm_bin::error::report_error_and_exit;
use crm_bin::{commands, init_logging, Cli};

fn main() {
    let cli = Cli::parse_args();
    let configured = crm_config::load_config(&cli.config).ok();
    init_logging(
        cli.effective_log_level(configured.as_ref().map(|c| c.log_level.as_str())),
        cli.log_format,
    );

    if let Err(err) = commands::execute(&cli) {
        report_error_and_exit(err);
    }
}
