// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use keyring_codeartifact::{default_backend, default_context, init_logging, KeyringBackend};
use log::debug;

/// Hand out AWS CodeArtifact tokens to pip and twine.
#[derive(Debug, Parser)]
#[command(name = "keyring-codeartifact", version, about)]
struct Cli {
    /// Path to keyringrc.cfg, overriding the default location.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the password for a repository URL.
    Get {
        service: String,
        username: Option<String>,
    },
    /// Store a password.
    Set {
        service: String,
        username: String,
        password: Option<String>,
    },
    /// Delete a password.
    Del { service: String, username: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    debug!("running {cli:?}");

    let ctx = default_context();
    let backend = default_backend(&ctx, cli.config.as_deref()).await;

    let result = match &cli.command {
        Command::Get { service, username } => {
            match backend.get_password(&ctx, service, username.as_deref()).await {
                Ok(Some(password)) => {
                    println!("{password}");
                    return ExitCode::SUCCESS;
                }
                Ok(None) => return ExitCode::FAILURE,
                Err(err) => Err(err),
            }
        }
        Command::Set {
            service,
            username,
            password,
        } => {
            backend
                .set_password(&ctx, service, username, password.as_deref().unwrap_or_default())
                .await
        }
        Command::Del { service, username } => {
            backend.delete_password(&ctx, service, username).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_unsupported() => {
            eprintln!("operation not supported");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
