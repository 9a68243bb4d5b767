// Copyright 2020-2024, The Tremor Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![deny(warnings)]
#![recursion_limit = "1024"]
#![deny(
    clippy::all,
    clippy::unwrap_used,
    clippy::unnecessary_unwrap,
    clippy::pedantic
)]

use crate::cli::{Cli, Command};
use anyhow::Result;
use clap::Parser;
use log::error;

mod cli;
mod completions;
mod logging;
mod query;
mod send;
mod verify;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let res = run(cli).await;
    if let Err(e) = &res {
        error!("{e}");
    }
    res
}

async fn run(cli: Cli) -> Result<()> {
    if !matches!(cli.command, Command::Completions { .. }) {
        logging::run(cli.logger_config.as_deref())?;
        tremor_loganalytics::version::log();
    }
    match cli.command {
        Command::Completions { shell } => completions::run_cmd(shell),
        Command::Send(cmd) => cmd.run().await,
        Command::Query(cmd) => cmd.run().await,
        Command::Verify(cmd) => cmd.run().await,
    }
}
