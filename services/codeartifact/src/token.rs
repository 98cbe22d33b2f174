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

use std::fmt::{Debug, Formatter};

use chrono::{DateTime as ChronoDateTime, TimeZone};
use keyring_codeartifact_core::time::{from_epoch_seconds, parse_rfc3339, DateTime};
use keyring_codeartifact_core::utils::Redact;
use keyring_codeartifact_core::{Error, Result};
use serde::Deserialize;

use crate::options::IssuerConfig;

/// A CodeArtifact authorization token.
#[derive(Clone)]
pub struct AuthorizationToken {
    /// The bearer token used as the repository password.
    pub token: String,
    /// When the token stops being accepted.
    pub expiration: Option<DateTime>,
}

impl AuthorizationToken {
    /// Create a new token.
    pub fn new(token: impl Into<String>, expiration: Option<DateTime>) -> Self {
        Self {
            token: token.into(),
            expiration,
        }
    }

    /// Whether the token is unusable at `now`.
    ///
    /// A token without expiration is treated as expired.
    pub fn is_expired_at<Tz: TimeZone>(&self, now: &ChronoDateTime<Tz>) -> bool {
        match self.expiration {
            Some(expiration) => expiration <= *now,
            None => true,
        }
    }
}

impl Debug for AuthorizationToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationToken")
            .field("token", &Redact::from(&self.token))
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Everything an issuer needs to ask for one token.
#[derive(Debug, Clone)]
pub struct TokenRequest {
    /// CodeArtifact domain name.
    pub domain: String,
    /// Domain owner account id.
    pub account: String,
    /// AWS region.
    pub region: String,
    /// Requested token lifetime in seconds.
    pub duration_seconds: u64,
    /// Options resolved for the repository.
    pub config: IssuerConfig,
}

/// `GetAuthorizationToken` output, as returned by the API and by
/// `aws codeartifact get-authorization-token --output json`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GetAuthorizationTokenOutput {
    authorization_token: String,
    expiration: Option<Expiration>,
}

/// The API encodes timestamps as epoch seconds, the AWS CLI as ISO 8601.
#[derive(Deserialize)]
#[serde(untagged)]
enum Expiration {
    Epoch(f64),
    Text(String),
}

impl GetAuthorizationTokenOutput {
    pub(crate) fn from_slice(bs: &[u8]) -> Result<Self> {
        serde_json::from_slice(bs).map_err(|e| {
            Error::unexpected("failed to parse GetAuthorizationToken output")
                .with_source(anyhow::Error::new(e))
        })
    }

    pub(crate) fn into_token(self) -> Result<AuthorizationToken> {
        let expiration = match self.expiration {
            None => None,
            Some(Expiration::Epoch(secs)) => Some(from_epoch_seconds(secs)?),
            Some(Expiration::Text(text)) => Some(parse_rfc3339(&text)?),
        };

        Ok(AuthorizationToken::new(self.authorization_token, expiration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_epoch_expiration() -> Result<()> {
        let token = GetAuthorizationTokenOutput::from_slice(
            br#"{"authorizationToken":"TOKEN","expiration":1646122354.5}"#,
        )?
        .into_token()?;

        assert_eq!(token.token, "TOKEN");
        assert_eq!(
            token.expiration.map(|v| v.timestamp_millis()),
            Some(1_646_122_354_500)
        );
        Ok(())
    }

    #[test]
    fn test_parse_text_expiration() -> Result<()> {
        let token = GetAuthorizationTokenOutput::from_slice(
            br#"{"authorizationToken":"TOKEN","expiration":"2022-03-01T16:12:34+08:00"}"#,
        )?
        .into_token()?;

        assert_eq!(
            token.expiration.map(|v| v.timestamp()),
            Some(1_646_122_354)
        );
        Ok(())
    }

    #[test]
    fn test_parse_missing_expiration() -> Result<()> {
        let token =
            GetAuthorizationTokenOutput::from_slice(br#"{"authorizationToken":"TOKEN"}"#)?
                .into_token()?;
        assert_eq!(token.expiration, None);
        Ok(())
    }

    #[test]
    fn test_parse_rejects_missing_token() {
        assert!(GetAuthorizationTokenOutput::from_slice(br#"{"expiration":1}"#).is_err());
    }

    #[test]
    fn test_is_expired_at() {
        let now = Utc::now();
        let local = now.with_timezone(&FixedOffset::east_opt(2 * 3600).expect("valid offset"));

        let token = AuthorizationToken::new("TOKEN", Some(now));
        assert!(token.is_expired_at(&now));
        assert!(token.is_expired_at(&local));

        let token = AuthorizationToken::new("TOKEN", Some(now + chrono::TimeDelta::seconds(1)));
        assert!(!token.is_expired_at(&local));

        let token = AuthorizationToken::new("TOKEN", None);
        assert!(token.is_expired_at(&now));
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = AuthorizationToken::new("eyJ2ZXIiOjEsImlzdSI6MTcwMDAwMDAwMH0", None);
        assert!(!format!("{token:?}").contains("eyJ2ZXIiOjEsImlzdSI6MTcwMDAwMDAwMH0"));
    }
}
