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

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use keyring_codeartifact_core::time::local_now;
use keyring_codeartifact_core::{Context, KeyringBackend, PasswordCredential, Result};
use log::{debug, warn};

use crate::config::{default_config_path, KeyringConfig};
use crate::constants::{PRINCIPAL, PRIORITY};
use crate::issue_token::{DefaultTokenIssuer, IssueToken};
use crate::options::IssuerConfig;
use crate::request::RepositoryRequest;
use crate::token::TokenRequest;

/// Keyring backend that answers password lookups for CodeArtifact PyPI
/// repositories with freshly issued authorization tokens.
///
/// The backend is read only: storing or deleting passwords is reported as
/// unsupported so the host moves on to its next backend.
#[derive(Debug, Clone)]
pub struct CodeArtifactBackend {
    config: Arc<KeyringConfig>,
    issuer: Arc<dyn IssueToken>,

    time: Option<DateTime<FixedOffset>>,
}

impl CodeArtifactBackend {
    /// Create a backend over `config` using the [`DefaultTokenIssuer`].
    pub fn new(config: KeyringConfig) -> Self {
        Self {
            config: Arc::new(config),
            issuer: Arc::new(DefaultTokenIssuer::new()),
            time: None,
        }
    }

    /// Create a backend from the configuration file at `path`, or at the
    /// default location when `path` is `None`.
    pub async fn load(ctx: &Context, path: Option<&str>) -> Self {
        let path = path.map(|v| v.to_string()).or_else(|| default_config_path(ctx));

        let config = match path {
            Some(path) => KeyringConfig::load(ctx, &path).await,
            None => {
                warn!("no keyring config location could be determined, using empty configuration");
                KeyringConfig::default()
            }
        };
        Self::new(config)
    }

    /// Replace the token issuer.
    pub fn with_issuer(mut self, issuer: impl IssueToken) -> Self {
        self.issuer = Arc::new(issuer);
        self
    }

    /// Specify the time tokens are checked against.
    ///
    /// # Note
    ///
    /// We should always take current time to check tokens.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime<FixedOffset>) -> Self {
        self.time = Some(time);
        self
    }

    /// The configuration lookups run against.
    pub fn config(&self) -> &KeyringConfig {
        &self.config
    }
}

#[async_trait]
impl KeyringBackend for CodeArtifactBackend {
    fn priority(&self) -> f64 {
        PRIORITY
    }

    async fn get_password(
        &self,
        ctx: &Context,
        service: &str,
        username: Option<&str>,
    ) -> Result<Option<String>> {
        let Some(repo) = RepositoryRequest::from_url(service) else {
            return Ok(None);
        };
        debug!("looking up token for {repo:?}, ignoring username {username:?}");

        let options = self.config.lookup(&repo.qualifier());
        let config = IssuerConfig::from_options(&repo.region, &options)?;
        let req = TokenRequest {
            domain: repo.domain,
            account: repo.account,
            region: repo.region,
            duration_seconds: config.token_duration,
            config,
        };

        let token = self.issuer.issue_token(ctx, &req).await?;

        let now = self.time.unwrap_or_else(local_now);
        if token.is_expired_at(&now) {
            warn!("received an expired CodeArtifact token: {token:?}");
            return Ok(None);
        }

        Ok(Some(token.token))
    }

    async fn get_credential(
        &self,
        ctx: &Context,
        service: &str,
        username: Option<&str>,
    ) -> Result<Option<PasswordCredential>> {
        let password = self.get_password(ctx, service, username).await?;
        Ok(password.map(|password| PasswordCredential::new(PRINCIPAL, password)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::AuthorizationToken;
    use chrono::{TimeDelta, TimeZone, Utc};
    use keyring_codeartifact_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    const SERVICE: &str = "https://domain-000000000000.d.codeartifact.region.amazonaws.com/pypi/repo/";

    #[derive(Debug, Default)]
    struct MockIssuer {
        expiration: Option<chrono::DateTime<Utc>>,
        requests: Mutex<Vec<TokenRequest>>,
    }

    #[async_trait]
    impl IssueToken for Arc<MockIssuer> {
        async fn issue_token(&self, _: &Context, req: &TokenRequest) -> Result<AuthorizationToken> {
            self.requests.lock().unwrap().push(req.clone());
            Ok(AuthorizationToken::new("TOKEN", self.expiration))
        }
    }

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(-7 * 3600)
            .expect("valid offset")
            .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
            .single()
            .expect("valid time")
    }

    fn backend(config: &str, expiration: Option<chrono::DateTime<Utc>>) -> (CodeArtifactBackend, Arc<MockIssuer>) {
        let issuer = Arc::new(MockIssuer {
            expiration,
            ..Default::default()
        });
        let backend = CodeArtifactBackend::new(KeyringConfig::parse(config).expect("config must parse"))
            .with_issuer(issuer.clone())
            .with_time(now());
        (backend, issuer)
    }

    #[tokio::test]
    async fn test_token_expiring_now_is_rejected() {
        let (backend, _) = backend("", Some(now().with_timezone(&Utc)));

        let password = backend.get_password(&Context::new(), SERVICE, None).await.unwrap();
        assert_eq!(password, None);
    }

    #[tokio::test]
    async fn test_token_without_expiration_is_rejected() {
        let (backend, _) = backend("", None);

        let password = backend.get_password(&Context::new(), SERVICE, None).await.unwrap();
        assert_eq!(password, None);
    }

    #[tokio::test]
    async fn test_token_valid_one_more_second_is_returned() {
        let expiration = now().with_timezone(&Utc) + TimeDelta::seconds(1);
        let (backend, issuer) = backend("", Some(expiration));

        let cred = backend
            .get_credential(&Context::new(), SERVICE, Some("ignored"))
            .await
            .unwrap()
            .expect("credential must be returned");
        assert_eq!(cred, PasswordCredential::new("aws", "TOKEN"));

        let requests = issuer.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].domain, "domain");
        assert_eq!(requests[0].account, "000000000000");
        assert_eq!(requests[0].region, "region");
        assert_eq!(requests[0].duration_seconds, 3600);
    }

    #[tokio::test]
    async fn test_resolved_options_reach_issuer() {
        let expiration = now().with_timezone(&Utc) + TimeDelta::hours(1);
        let (backend, issuer) = backend(
            "[codeartifact]\ntoken_duration = 1800\n[codeartifact name=repo]\nprofile_name = repo_profile\n",
            Some(expiration),
        );

        backend.get_password(&Context::new(), SERVICE, None).await.unwrap();

        let requests = issuer.requests.lock().unwrap();
        assert_eq!(requests[0].duration_seconds, 1800);
        assert_eq!(requests[0].config.region, "region");
        assert_eq!(requests[0].config.profile_name.as_deref(), Some("repo_profile"));
    }

    #[tokio::test]
    async fn test_unrelated_url_skips_issuer() {
        let (backend, issuer) = backend("", Some(Utc::now()));

        let password = backend
            .get_password(&Context::new(), "https://pypi.org/simple/", None)
            .await
            .unwrap();
        assert_eq!(password, None);
        assert!(issuer.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_token_duration_is_an_error() {
        let (backend, _) = backend("[codeartifact]\ntoken_duration = soon\n", Some(Utc::now()));

        let err = backend
            .get_password(&Context::new(), SERVICE, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[tokio::test]
    async fn test_writes_are_unsupported() {
        let (backend, _) = backend("", None);
        let ctx = Context::new();

        let err = backend
            .set_password(&ctx, SERVICE, "aws", "TOKEN")
            .await
            .unwrap_err();
        assert!(err.is_unsupported());

        let err = backend.delete_password(&ctx, SERVICE, "aws").await.unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_priority() {
        let backend = CodeArtifactBackend::new(KeyringConfig::default());
        assert_eq!(backend.priority(), 9.9);
    }
}
