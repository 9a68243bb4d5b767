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
use clap::Parser;

/// Tremor Log Analytics - ship entities to a workspace and read them back
#[derive(Parser, Debug)]
#[clap(name = "law", author, version)]
pub(crate) struct Cli {
    /// Configuration for Log4RS
    #[clap(short, long, value_parser = clap::value_parser!(String))]
    pub(crate) logger_config: Option<String>,
    #[clap(subcommand)]
    pub(crate) command: Command,
}

#[derive(Parser, Debug)]
pub(crate) enum Command {
    /// Generate shell completions to stdout. Tries to guess the shell if no subcommand is given.
    Completions {
        #[clap(value_enum, value_parser = clap::value_parser!(clap_complete::shells::Shell))]
        shell: Option<clap_complete::shells::Shell>,
    },
    /// Sends the entities of a JSON file (an object or an array of objects) to a workspace
    Send(SendArgs),
    /// Runs a KQL query against a workspace and prints the resulting rows as JSON
    Query(QueryArgs),
    /// Sends synthetic entities, waits for their ingestion and checks they can be queried back
    Verify(VerifyArgs),
}

#[derive(Parser, Debug)]
pub(crate) struct SecretsArgs {
    /// YAML or JSON secrets file, `LAW_*` environment variables take precedence
    #[clap(short, long, value_parser = clap::value_parser!(String))]
    pub(crate) secrets: Option<String>,
}

#[derive(Parser, Debug)]
pub(crate) struct SendArgs {
    #[clap(flatten)]
    pub(crate) secrets: SecretsArgs,
    /// Log type, the entities end up in the `<log type>_CL` table
    #[clap(short = 't', long, value_parser = clap::value_parser!(String))]
    pub(crate) log_type: String,
    /// Azure resource id the entities are associated with
    #[clap(long, value_parser = clap::value_parser!(String))]
    pub(crate) resource_id: Option<String>,
    /// Field of the entities holding their generation time
    #[clap(long, value_parser = clap::value_parser!(String))]
    pub(crate) time_generated_field: Option<String>,
    /// Request timeout in milliseconds
    #[clap(long, value_parser = clap::value_parser!(u64))]
    pub(crate) timeout: Option<u64>,
    /// Input file
    #[clap(default_value = "-", value_parser = clap::value_parser!(String))]
    pub(crate) infile: String,
}

#[derive(Parser, Debug)]
pub(crate) struct QueryArgs {
    #[clap(flatten)]
    pub(crate) secrets: SecretsArgs,
    /// Pretty print the rows
    #[clap(long, action = clap::ArgAction::SetTrue)]
    pub(crate) pretty: bool,
    /// The KQL query
    #[clap(value_parser = clap::value_parser!(String))]
    pub(crate) query: String,
}

#[derive(Parser, Debug)]
pub(crate) struct VerifyArgs {
    #[clap(flatten)]
    pub(crate) secrets: SecretsArgs,
    /// Seconds to wait for the workspace to ingest the entities
    #[clap(long, default_value_t = 360, value_parser = clap::value_parser!(u64))]
    pub(crate) latency: u64,
    /// Log type to send the synthetic entities to
    #[clap(short = 't', long, value_parser = clap::value_parser!(String))]
    pub(crate) log_type: Option<String>,
}
