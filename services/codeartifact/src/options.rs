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

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use keyring_codeartifact_core::utils::Redact;
use keyring_codeartifact_core::{Error, Result};

use crate::config::Options;
use crate::constants::DEFAULT_TOKEN_DURATION;

/// TLS certificate verification for outgoing API requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsVerify {
    /// Verify against the built-in roots, or skip verification.
    Enabled(bool),
    /// Verify against the PEM bundle at this path instead of the built-in roots.
    CaBundle(String),
}

impl Default for TlsVerify {
    fn default() -> Self {
        TlsVerify::Enabled(true)
    }
}

impl TlsVerify {
    /// Interpret a `verify` option.
    ///
    /// Boolean words are accepted case-insensitively. Anything else is a CA
    /// bundle path, with one pair of surrounding quotes removed.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "1" | "yes" | "on" | "true" => TlsVerify::Enabled(true),
            "0" | "no" | "off" | "false" => TlsVerify::Enabled(false),
            _ => TlsVerify::CaBundle(strip_quotes(value).to_string()),
        }
    }
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Typed view of a resolved option set, plus the region of the request.
#[derive(Clone, PartialEq)]
pub struct IssuerConfig {
    /// Region taken from the repository URL.
    pub region: String,
    /// Named AWS profile to load credentials from.
    pub profile_name: Option<String>,
    /// Static access key id.
    pub aws_access_key_id: Option<String>,
    /// Static secret access key.
    pub aws_secret_access_key: Option<String>,
    /// Requested token lifetime in seconds.
    pub token_duration: u64,
    /// Certificate verification for the API endpoint.
    pub verify: TlsVerify,
    /// Teleport proxy address used by `tsh login`.
    pub teleport_proxy: Option<String>,
    /// Teleport application fronting AWS. Selects the Teleport issuer.
    pub tsh_app_name: Option<String>,
    /// AWS role assumed through the Teleport application.
    pub tsh_aws_role_name: Option<String>,
    /// Options this crate does not interpret.
    pub extra: HashMap<String, String>,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            profile_name: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            token_duration: DEFAULT_TOKEN_DURATION,
            verify: TlsVerify::default(),
            teleport_proxy: None,
            tsh_app_name: None,
            tsh_aws_role_name: None,
            extra: HashMap::new(),
        }
    }
}

impl Debug for IssuerConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuerConfig")
            .field("region", &self.region)
            .field("profile_name", &self.profile_name)
            .field("aws_access_key_id", &Redact::from(&self.aws_access_key_id))
            .field(
                "aws_secret_access_key",
                &Redact::from(&self.aws_secret_access_key),
            )
            .field("token_duration", &self.token_duration)
            .field("verify", &self.verify)
            .field("teleport_proxy", &self.teleport_proxy)
            .field("tsh_app_name", &self.tsh_app_name)
            .field("tsh_aws_role_name", &self.tsh_aws_role_name)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl IssuerConfig {
    /// Build the issuer config for a request in `region`.
    ///
    /// Empty values count as unset.
    pub fn from_options(region: &str, options: &Options) -> Result<Self> {
        let mut cfg = IssuerConfig {
            region: region.to_string(),
            ..Default::default()
        };

        for (key, value) in options {
            let non_empty = || Some(value.clone()).filter(|v| !v.trim().is_empty());
            match key.as_str() {
                "profile_name" => cfg.profile_name = non_empty(),
                "aws_access_key_id" => cfg.aws_access_key_id = non_empty(),
                "aws_secret_access_key" => cfg.aws_secret_access_key = non_empty(),
                "teleport_proxy" => cfg.teleport_proxy = non_empty(),
                "tsh_app_name" => cfg.tsh_app_name = non_empty(),
                "tsh_aws_role_name" => cfg.tsh_aws_role_name = non_empty(),
                "verify" => {
                    if let Some(value) = non_empty() {
                        cfg.verify = TlsVerify::parse(&value);
                    }
                }
                "token_duration" => {
                    if let Some(value) = non_empty() {
                        cfg.token_duration = value.trim().parse().map_err(|e| {
                            Error::config_invalid("token_duration must be a non-negative integer")
                                .with_source(anyhow::Error::new(e))
                                .with_context(format!("token_duration: {value}"))
                        })?;
                    }
                }
                _ => {
                    cfg.extra.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(cfg)
    }
}
