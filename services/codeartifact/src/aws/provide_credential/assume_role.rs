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
use keyring_codeartifact_core::hash::hex_sha256;
use keyring_codeartifact_core::time::{now, parse_rfc3339};
use keyring_codeartifact_core::{Context, Error, ProvideCredential, Result, SignRequest};
use log::debug;
use quick_xml::de;
use serde::Deserialize;

use crate::aws::{Credential, RequestSigner};
use crate::constants::*;

/// AssumeRoleCredentialProvider exchanges a source credential for the
/// temporary credential of `role_arn` through STS `AssumeRole`.
///
/// It backs profiles carrying `role_arn`:
///
/// ```ini
/// [profile deploy]
/// role_arn = arn:aws:iam::123456789012:role/deploy
/// source_profile = base
/// external_id = my-external-id
/// role_session_name = my-session
/// duration_seconds = 1800
/// ```
#[derive(Debug, Clone)]
pub struct AssumeRoleCredentialProvider {
    role_arn: String,
    role_session_name: Option<String>,
    external_id: Option<String>,
    duration_seconds: u32,
    region: Option<String>,
    source: Credential,
}

impl AssumeRoleCredentialProvider {
    /// Create a provider assuming `role_arn` with the `source` credential.
    pub fn new(role_arn: impl Into<String>, source: Credential) -> Self {
        Self {
            role_arn: role_arn.into(),
            role_session_name: None,
            external_id: None,
            duration_seconds: DEFAULT_ASSUME_ROLE_DURATION,
            region: None,
            source,
        }
    }

    /// Set the role session name.
    pub fn with_role_session_name(mut self, name: impl Into<String>) -> Self {
        self.role_session_name = Some(name.into());
        self
    }

    /// Set the external ID.
    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    /// Set the lifetime of the assumed credential.
    pub fn with_duration_seconds(mut self, seconds: u32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Set the region of the STS endpoint.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    fn build_request(&self, endpoint: &str) -> Result<http::Request<Bytes>> {
        let session_name = self
            .role_session_name
            .clone()
            .unwrap_or_else(|| format!("keyring-codeartifact-{}", now().timestamp()));

        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("Action", "AssumeRole")
            .append_pair("RoleArn", &self.role_arn)
            .append_pair("Version", STS_API_VERSION)
            .append_pair("RoleSessionName", &session_name)
            .append_pair("DurationSeconds", &self.duration_seconds.to_string());
        if let Some(external_id) = &self.external_id {
            query.append_pair("ExternalId", external_id);
        }

        let body = Bytes::new();
        Ok(http::Request::get(format!("https://{endpoint}/?{}", query.finish()))
            .header(X_AMZ_CONTENT_SHA_256, hex_sha256(&body))
            .body(body)?)
    }
}

/// Host of the regional STS endpoint.
pub(crate) fn sts_endpoint(region: &str) -> String {
    if region.starts_with("cn-") {
        format!("sts.{region}.amazonaws.com.cn")
    } else {
        format!("sts.{region}.amazonaws.com")
    }
}

#[async_trait]
impl ProvideCredential for AssumeRoleCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let region = self.region.as_deref().unwrap_or(DEFAULT_STS_REGION);
        let endpoint = sts_endpoint(region);

        let (mut parts, body) = self.build_request(&endpoint)?.into_parts();
        RequestSigner::new(STS_SERVICE, region)
            .sign_request(ctx, &mut parts, Some(&self.source))
            .await?;

        debug!("assuming role {} through {endpoint}", self.role_arn);
        let resp = ctx
            .http_send_as_string(http::Request::from_parts(parts, body))
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let err = match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Error::credential_denied("STS refused to assume role")
                }
                _ => Error::unexpected("STS AssumeRole failed"),
            };
            return Err(err
                .with_context(format!("role_arn: {}", self.role_arn))
                .with_context(format!("status: {status}"))
                .with_context(format!("body: {}", resp.body())));
        }

        let resp: AssumeRoleResponse = de::from_str(resp.body()).map_err(|e| {
            Error::unexpected("failed to parse STS AssumeRole response")
                .with_source(anyhow::Error::new(e))
                .with_context(format!("role_arn: {}", self.role_arn))
        })?;
        let cred = resp.result.credentials;

        Ok(Some(Credential {
            access_key_id: cred.access_key_id,
            secret_access_key: cred.secret_access_key,
            session_token: Some(cred.session_token),
            expires_in: Some(parse_rfc3339(&cred.expiration)?),
        }))
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AssumeRoleResponse {
    #[serde(rename = "AssumeRoleResult")]
    result: AssumeRoleResult,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AssumeRoleResult {
    credentials: AssumeRoleCredentials,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AssumeRoleCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expiration: String,
}
