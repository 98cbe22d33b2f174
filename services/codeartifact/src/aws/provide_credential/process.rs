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

use async_trait::async_trait;
use keyring_codeartifact_core::time::parse_rfc3339;
use keyring_codeartifact_core::{Context, Error, ProvideCredential, Result};
use log::debug;
use serde::Deserialize;

use crate::aws::Credential;

/// ProcessCredentialProvider runs the `credential_process` of a profile
/// and reads credentials from its output.
///
/// ```ini
/// [profile my-process-profile]
/// credential_process = /path/to/credential/helper --arg1 value1
/// ```
///
/// The process must print JSON like:
///
/// ```json
/// {
///   "Version": 1,
///   "AccessKeyId": "access_key",
///   "SecretAccessKey": "secret_key",
///   "SessionToken": "session_token",
///   "Expiration": "2023-12-01T00:00:00Z"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ProcessCredentialProvider {
    command: String,
}

impl ProcessCredentialProvider {
    /// Create a provider running `command`.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProcessCredentialOutput {
    version: u32,
    access_key_id: String,
    secret_access_key: String,
    #[serde(default)]
    session_token: Option<String>,
    #[serde(default)]
    expiration: Option<String>,
}

#[async_trait]
impl ProvideCredential for ProcessCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        // Arguments are split on whitespace, quoting is not interpreted.
        let parts: Vec<&str> = self.command.split_whitespace().collect();
        let Some((program, args)) = parts.split_first() else {
            return Err(Error::config_invalid("credential_process command is empty"));
        };

        debug!("executing credential process: {program}");
        let output = ctx.command_execute(program, args).await?;
        if !output.success() {
            return Err(Error::unexpected("credential process failed")
                .with_context(format!("command: {program}"))
                .with_context(format!("status: {}", output.status))
                .with_context(format!("stderr: {}", output.stderr_trimmed())));
        }

        let output: ProcessCredentialOutput =
            serde_json::from_slice(&output.stdout).map_err(|e| {
                Error::unexpected("failed to parse credential process output")
                    .with_source(anyhow::Error::new(e))
                    .with_context(format!("command: {program}"))
            })?;
        if output.version != 1 {
            return Err(Error::unexpected("unsupported credential process version")
                .with_context(format!("version: {}", output.version)));
        }

        let expires_in = output
            .expiration
            .as_deref()
            .map(parse_rfc3339)
            .transpose()?;

        Ok(Some(Credential {
            access_key_id: output.access_key_id,
            secret_access_key: output.secret_access_key,
            session_token: output.session_token,
            expires_in,
        }))
    }
}
