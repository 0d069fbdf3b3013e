// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # mig-parted
//!
//! Command-line interface for MIG partition management. Every command runs
//! against a simulated node of identical devices.
//!
//! ## Usage
//! ```bash
//! # List the profiles of a device model
//! mig-parted catalog --model A100-SXM4-40GB
//!
//! # Print every admissible layout
//! mig-parted enumerate --model A30-24GB --json
//!
//! # Apply a named config to an 8-GPU node
//! mig-parted apply --config configs/mig-parted.toml --select mixed --gpus 8
//!
//! # Apply, then check every device holds its target
//! mig-parted assert --config configs/mig-parted.toml --select all-1g
//! ```

mod commands;

use clap::{Parser, Subcommand};
use mig_types::DeviceModel;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mig-parted",
    about = "MIG partition manager for multi-instance GPUs",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the profiles a device model supports.
    Catalog {
        /// Device model, e.g. "A100-SXM4-40GB".
        #[arg(short, long, default_value = "A100-SXM4-40GB")]
        model: DeviceModel,
    },

    /// Print every admissible layout of a device model.
    Enumerate {
        /// Device model, e.g. "A100-SXM4-40GB".
        #[arg(short, long, default_value = "A100-SXM4-40GB")]
        model: DeviceModel,

        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Apply a named config from a TOML file to a simulated node.
    Apply {
        #[command(flatten)]
        target: NodeArgs,
    },

    /// Apply a named config, then assert every device holds its target.
    Assert {
        #[command(flatten)]
        target: NodeArgs,
    },
}

/// Arguments shared by the commands that drive a node.
#[derive(clap::Args)]
struct NodeArgs {
    /// Path to the TOML partition configuration.
    #[arg(short, long)]
    config: PathBuf,

    /// Name of the config to apply.
    #[arg(short, long)]
    select: String,

    /// Device model of every GPU in the node.
    #[arg(short, long, default_value = "A100-SXM4-40GB")]
    model: DeviceModel,

    /// Number of GPUs in the node.
    #[arg(short, long, default_value_t = 8)]
    gpus: usize,
}

impl From<NodeArgs> for commands::NodeSpec {
    fn from(args: NodeArgs) -> Self {
        commands::NodeSpec {
            config: args.config,
            select: args.select,
            model: args.model,
            gpus: args.gpus,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Catalog { model } => commands::catalog::execute(model).await,
        Commands::Enumerate { model, json } => commands::enumerate::execute(model, json).await,
        Commands::Apply { target } => commands::apply::execute(target.into()).await,
        Commands::Assert { target } => commands::assert::execute(target.into()).await,
    }
}
