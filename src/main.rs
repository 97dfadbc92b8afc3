// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::process::ExitCode;

use clap::Parser;
use ntpsync::cli::{self, Args};

fn main() -> ExitCode {
    env_logger::init();
    cli::run(Args::parse())
}
