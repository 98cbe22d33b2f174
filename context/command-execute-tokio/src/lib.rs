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

//! Tokio-based command execution for the keyring context.
//!
//! The Teleport token issuer drives the `tsh` CLI through this executor.
//!
//! ```no_run
//! use keyring_codeartifact_command_execute_tokio::TokioCommandExecute;
//! use keyring_codeartifact_core::Context;
//!
//! # async fn example() -> keyring_codeartifact_core::Result<()> {
//! let ctx = Context::new().with_command_execute(TokioCommandExecute);
//! let output = ctx.command_execute("tsh", &["version"]).await?;
//! if output.success() {
//!     println!("{}", output.stdout_trimmed());
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use keyring_codeartifact_core::{CommandExecute, CommandOutput, Error, Result};
use log::debug;
use std::process::Stdio;
use tokio::process::Command;

/// Tokio-based implementation of the `CommandExecute` trait.
///
/// Stdin is closed so an interactive prompt fails instead of hanging the
/// host. A program that can not be spawned at all is reported as an error;
/// a program that runs and exits non-zero is returned as a normal
/// [`CommandOutput`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandExecute;

#[async_trait]
impl CommandExecute for TokioCommandExecute {
    async fn command_execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!("executing command: {program} {}", args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                Error::unexpected(format!("failed to execute command '{program}'"))
                    .with_source(e)
                    .with_context(format!("args: {args:?}"))
            })?;

        let status = output.status.code().unwrap_or(-1);
        debug!("command {program} exited with status {status}");

        Ok(CommandOutput {
            status,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
