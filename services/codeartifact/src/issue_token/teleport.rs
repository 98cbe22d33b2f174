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
use keyring_codeartifact_core::{CommandOutput, Context, Error, Result};
use log::debug;

use super::IssueToken;
use crate::constants::TSH_PROGRAM;
use crate::token::{AuthorizationToken, GetAuthorizationTokenOutput, TokenRequest};

const TSH_NOT_AVAILABLE: &str =
    "failed to run tsh. Confirm it is installed and available via PATH";

/// TeleportTokenIssuer asks for tokens through the Teleport `tsh` CLI.
///
/// Logging in to the cluster and to the AWS application only happens when
/// `tsh` reports that the current session can not be used.
#[derive(Debug, Default, Clone)]
pub struct TeleportTokenIssuer;

impl TeleportTokenIssuer {
    /// Create a new TeleportTokenIssuer.
    pub fn new() -> Self {
        Self
    }

    async fn ensure_installed(&self, ctx: &Context) -> Result<()> {
        let output = ctx
            .command_execute(TSH_PROGRAM, &["version"])
            .await
            .map_err(|e| Error::unexpected(TSH_NOT_AVAILABLE).with_source(e))?;

        if !output.success() {
            return Err(Error::unexpected(TSH_NOT_AVAILABLE)
                .with_context(format!("stderr: {}", output.stderr_trimmed())));
        }
        Ok(())
    }

    async fn is_logged_in(&self, ctx: &Context) -> Result<bool> {
        let output = ctx.command_execute(TSH_PROGRAM, &["status"]).await?;
        if !output.success() {
            debug!("not logged in to teleport: {}", output.stderr_trimmed());
        }
        Ok(output.success())
    }

    async fn is_app_logged_in(&self, ctx: &Context, app: &str) -> Result<bool> {
        let output = ctx
            .command_execute(TSH_PROGRAM, &["app", "config", app])
            .await?;
        if !output.success() {
            debug!("not logged in to teleport app {app}: {}", output.stderr_trimmed());
        }
        Ok(output.success())
    }

    async fn get_authorization_token(
        &self,
        ctx: &Context,
        req: &TokenRequest,
    ) -> Result<AuthorizationToken> {
        let duration = req.duration_seconds.to_string();
        let output = run_checked(
            ctx,
            &[
                "aws",
                "codeartifact",
                "get-authorization-token",
                "--domain",
                &req.domain,
                "--domain-owner",
                &req.account,
                "--region",
                &req.region,
                "--duration-seconds",
                &duration,
                "--output",
                "json",
            ],
            "failed to get CodeArtifact token through teleport",
        )
        .await?;

        GetAuthorizationTokenOutput::from_slice(&output.stdout)?.into_token()
    }
}

/// Run tsh and turn a non-zero exit into an error.
async fn run_checked(ctx: &Context, args: &[&str], message: &str) -> Result<CommandOutput> {
    let output = ctx.command_execute(TSH_PROGRAM, args).await?;
    if !output.success() {
        return Err(Error::unexpected(message)
            .with_context(format!("command: {TSH_PROGRAM} {}", args.join(" ")))
            .with_context(format!("status: {}", output.status))
            .with_context(format!("stderr: {}", output.stderr_trimmed())));
    }
    Ok(output)
}

#[async_trait]
impl IssueToken for TeleportTokenIssuer {
    async fn issue_token(&self, ctx: &Context, req: &TokenRequest) -> Result<AuthorizationToken> {
        let cfg = &req.config;
        let app = cfg.tsh_app_name.as_deref().ok_or_else(|| {
            Error::config_invalid("tsh_app_name is required to issue tokens through teleport")
        })?;

        self.ensure_installed(ctx).await?;

        if !self.is_logged_in(ctx).await? {
            let proxy = cfg.teleport_proxy.as_deref().ok_or_else(|| {
                Error::config_invalid("teleport_proxy is required to log in to teleport")
            })?;
            let proxy = format!("--proxy={proxy}");
            run_checked(ctx, &["login", &proxy], "failed to log in to teleport").await?;
        }

        if !self.is_app_logged_in(ctx, app).await? {
            let role = cfg.tsh_aws_role_name.as_deref().ok_or_else(|| {
                Error::config_invalid("tsh_aws_role_name is required to log in to a teleport app")
            })?;
            run_checked(
                ctx,
                &["app", "login", app, "--aws-role", role],
                "failed to log in to teleport app",
            )
            .await?;
        }

        self.get_authorization_token(ctx, req).await
    }
}
