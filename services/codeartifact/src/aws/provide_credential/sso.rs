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
use bytes::Bytes;
use http::StatusCode;
use keyring_codeartifact_core::hash::hex_sha1;
use keyring_codeartifact_core::time::{from_epoch_seconds, now, parse_rfc3339};
use keyring_codeartifact_core::{Context, Error, ProvideCredential, Result};
use log::debug;
use serde::Deserialize;

use crate::aws::Credential;
use crate::constants::*;

/// SsoCredentialProvider exchanges the cached IAM Identity Center token
/// for role credentials.
///
/// The token is the one `aws sso login` writes into `~/.aws/sso/cache`.
/// Both legacy profiles and profiles pointing at an `sso-session`
/// section are supported:
///
/// ```ini
/// [profile legacy]
/// sso_start_url = https://my-sso-portal.awsapps.com/start
/// sso_region = us-east-1
/// sso_account_id = 123456789012
/// sso_role_name = ReadOnly
///
/// [profile modern]
/// sso_session = my-sso
/// sso_account_id = 123456789012
/// sso_role_name = ReadOnly
///
/// [sso-session my-sso]
/// sso_start_url = https://my-sso-portal.awsapps.com/start
/// sso_region = us-east-1
/// ```
#[derive(Debug, Clone)]
pub struct SsoCredentialProvider {
    start_url: String,
    session_name: Option<String>,
    region: String,
    account_id: String,
    role_name: String,
}

impl SsoCredentialProvider {
    /// Create a provider for a legacy SSO profile.
    pub fn new(
        start_url: impl Into<String>,
        region: impl Into<String>,
        account_id: impl Into<String>,
        role_name: impl Into<String>,
    ) -> Self {
        Self {
            start_url: start_url.into(),
            session_name: None,
            region: region.into(),
            account_id: account_id.into(),
            role_name: role_name.into(),
        }
    }

    /// Use the token cached for the named `sso-session`.
    pub fn with_session_name(mut self, name: impl Into<String>) -> Self {
        self.session_name = Some(name.into());
        self
    }

    /// Path of the cached token, keyed by the session name or, for
    /// legacy profiles, the start url.
    fn cache_path(&self) -> String {
        let key = self.session_name.as_deref().unwrap_or(&self.start_url);
        format!("~/.aws/sso/cache/{}.json", hex_sha1(key.as_bytes()))
    }

    async fn load_token(&self, ctx: &Context) -> Result<String> {
        let path = self.cache_path();
        let expanded = ctx.expand_home_dir(&path).ok_or_else(|| {
            Error::credential_invalid("failed to locate the SSO token cache without a home dir")
        })?;

        let content = ctx.file_read(&expanded).await.map_err(|e| {
            Error::credential_invalid("SSO token cache not found, run `aws sso login`")
                .with_source(e)
                .with_context(format!("path: {expanded}"))
        })?;
        let token: SsoTokenCache = serde_json::from_slice(&content).map_err(|e| {
            Error::credential_invalid("failed to parse SSO token cache")
                .with_source(anyhow::Error::new(e))
                .with_context(format!("path: {expanded}"))
        })?;

        // Older CLIs write `2024-03-10T12:00:00UTC`.
        let expires_at = match token.expires_at.strip_suffix("UTC") {
            Some(v) => parse_rfc3339(&format!("{v}Z"))?,
            None => parse_rfc3339(&token.expires_at)?,
        };
        if expires_at <= now() {
            return Err(
                Error::credential_expired("SSO token has expired, run `aws sso login`")
                    .with_context(format!("expires_at: {}", token.expires_at)),
            );
        }

        Ok(token.access_token)
    }
}

#[async_trait]
impl ProvideCredential for SsoCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let token = self.load_token(ctx).await?;

        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("role_name", &self.role_name)
            .append_pair("account_id", &self.account_id)
            .finish();
        let url = format!(
            "https://portal.sso.{}.amazonaws.com/federation/credentials?{query}",
            self.region
        );
        let req = http::Request::get(url)
            .header(X_AMZ_SSO_BEARER_TOKEN, token)
            .body(Bytes::new())?;

        debug!(
            "fetching SSO role credentials for {} in account {}",
            self.role_name, self.account_id
        );
        let resp = ctx.http_send_as_string(req).await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let err = match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Error::credential_denied("SSO refused the cached token")
                }
                _ => Error::unexpected("SSO GetRoleCredentials failed"),
            };
            return Err(err
                .with_context(format!("status: {status}"))
                .with_context(format!("body: {}", resp.body())));
        }

        let resp: RoleCredentialsResponse = serde_json::from_str(resp.body()).map_err(|e| {
            Error::unexpected("failed to parse SSO role credentials")
                .with_source(anyhow::Error::new(e))
        })?;
        let cred = resp.role_credentials;

        Ok(Some(Credential {
            access_key_id: cred.access_key_id,
            secret_access_key: cred.secret_access_key,
            session_token: Some(cred.session_token),
            expires_in: Some(from_epoch_seconds(cred.expiration as f64 / 1000.0)?),
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SsoTokenCache {
    access_token: String,
    expires_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoleCredentialsResponse {
    role_credentials: RoleCredentials,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoleCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    /// Milliseconds since the epoch.
    expiration: i64,
}
