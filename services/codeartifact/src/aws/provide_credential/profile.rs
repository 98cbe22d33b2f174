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
use ini::{Ini, Properties};
use keyring_codeartifact_core::{Context, Error, ProvideCredential, Result};
use log::debug;

use super::{
    AssumeRoleCredentialProvider, EnvCredentialProvider, ProcessCredentialProvider,
    SsoCredentialProvider,
};
use crate::aws::Credential;
use crate::constants::*;

/// ProfileCredentialProvider loads AWS credentials from the shared files:
///
/// - `~/.aws/credentials` (or the path specified by `AWS_SHARED_CREDENTIALS_FILE`)
/// - `~/.aws/config` (or the path specified by `AWS_CONFIG_FILE`)
///
/// The profile to use is determined by:
/// 1. The profile specified via `with_profile()`, such as the
///    `profile_name` option of a keyring section
/// 2. The `AWS_PROFILE` environment variable
/// 3. Default to "default"
///
/// A profile resolves to the first of:
///
/// - `role_arn`: the role is assumed with the credential of
///   `source_profile` or of `credential_source = Environment`. Roles can
///   be chained through several profiles.
/// - `sso_start_url` or `sso_session`: role credentials of IAM Identity
///   Center, using the token cached by `aws sso login`.
/// - static keys from the credentials file.
/// - `credential_process`.
/// - static keys from the config file.
#[derive(Debug, Default, Clone)]
pub struct ProfileCredentialProvider {
    profile: Option<String>,
    region: Option<String>,
}

impl ProfileCredentialProvider {
    /// Create a new ProfileCredentialProvider with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the profile name to use.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the region used to reach STS when the profile sets none.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    async fn load_ini(&self, ctx: &Context, path: &str) -> Result<Option<Ini>> {
        let Some(expanded_path) = ctx.expand_home_dir(path) else {
            debug!("failed to expand homedir for path: {path}");
            return Ok(None);
        };

        let content = match ctx.file_read_as_string(&expanded_path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("failed to read aws shared file {expanded_path}: {err:?}");
                return Ok(None);
            }
        };

        let conf = Ini::load_from_str(&content).map_err(|e| {
            Error::config_invalid("failed to parse aws shared file")
                .with_source(anyhow::Error::new(e))
                .with_context(format!("path: {expanded_path}"))
        })?;
        Ok(Some(conf))
    }

    async fn load_shared_files(&self, ctx: &Context) -> Result<SharedFiles> {
        let config_path = ctx
            .env_var(AWS_CONFIG_FILE)
            .unwrap_or_else(|| "~/.aws/config".to_string());
        let credentials_path = ctx
            .env_var(AWS_SHARED_CREDENTIALS_FILE)
            .unwrap_or_else(|| "~/.aws/credentials".to_string());

        Ok(SharedFiles {
            config: self.load_ini(ctx, &config_path).await?,
            credentials: self.load_ini(ctx, &credentials_path).await?,
        })
    }

    /// Credential of a profile that does not assume a role.
    async fn leaf_credential(
        &self,
        ctx: &Context,
        files: &SharedFiles,
        profile: &str,
    ) -> Result<Option<Credential>> {
        if let Some(provider) = files.sso_provider(profile)? {
            debug!("profile {profile} uses sso");
            return provider.provide_credential(ctx).await;
        }

        if let Some(cred) = files
            .credentials_section(profile)
            .and_then(credential_from_props)
        {
            return Ok(Some(cred));
        }

        if let Some(command) = files.get(profile, "credential_process") {
            debug!("profile {profile} uses credential_process");
            return ProcessCredentialProvider::new(command)
                .provide_credential(ctx)
                .await;
        }

        Ok(files.config_section(profile).and_then(credential_from_props))
    }
}

/// One `role_arn` to assume, read from the profile naming it.
#[derive(Debug)]
struct RoleHop {
    role_arn: String,
    role_session_name: Option<String>,
    external_id: Option<String>,
    duration_seconds: Option<u32>,
    region: Option<String>,
}

impl RoleHop {
    fn from_profile(files: &SharedFiles, profile: &str, role_arn: &str) -> Result<Self> {
        if files.get(profile, "mfa_serial").is_some() {
            return Err(Error::config_invalid(
                "assuming a role with mfa_serial needs an interactive prompt",
            )
            .with_context(format!("profile: {profile}")));
        }

        let duration_seconds = files
            .get(profile, "duration_seconds")
            .map(|v| {
                v.parse::<u32>().map_err(|e| {
                    Error::config_invalid("duration_seconds is not a valid number")
                        .with_source(anyhow::Error::new(e))
                        .with_context(format!("profile: {profile}"))
                })
            })
            .transpose()?;

        Ok(Self {
            role_arn: role_arn.to_string(),
            role_session_name: files.get(profile, "role_session_name").map(String::from),
            external_id: files.get(profile, "external_id").map(String::from),
            duration_seconds,
            region: files.get(profile, "region").map(String::from),
        })
    }
}

/// Parsed `~/.aws/config` and `~/.aws/credentials`.
#[derive(Debug, Default)]
struct SharedFiles {
    config: Option<Ini>,
    credentials: Option<Ini>,
}

impl SharedFiles {
    fn config_section(&self, profile: &str) -> Option<&Properties> {
        let section = match profile {
            "default" => "default".to_string(),
            x => format!("profile {x}"),
        };
        self.config.as_ref()?.section(Some(section.as_str()))
    }

    fn credentials_section(&self, profile: &str) -> Option<&Properties> {
        self.credentials.as_ref()?.section(Some(profile))
    }

    fn has_profile(&self, profile: &str) -> bool {
        self.config_section(profile).is_some() || self.credentials_section(profile).is_some()
    }

    /// Non-empty value of `key`, the credentials file winning over the
    /// config file.
    fn get(&self, profile: &str, key: &str) -> Option<&str> {
        self.credentials_section(profile)
            .and_then(|p| p.get(key))
            .or_else(|| self.config_section(profile).and_then(|p| p.get(key)))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn sso_provider(&self, profile: &str) -> Result<Option<SsoCredentialProvider>> {
        let required = |props: Option<&Properties>, key: &str, section: &str| {
            props
                .and_then(|p| p.get(key))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .ok_or_else(|| {
                    Error::config_invalid(format!("{key} is required for sso"))
                        .with_context(format!("section: {section}"))
                })
        };

        if let Some(session) = self.get(profile, "sso_session") {
            let section_name = format!("sso-session {session}");
            let section = self
                .config
                .as_ref()
                .and_then(|c| c.section(Some(section_name.as_str())));
            if section.is_none() {
                return Err(Error::config_invalid("sso-session section not found")
                    .with_context(format!("profile: {profile}"))
                    .with_context(format!("sso_session: {session}")));
            }

            let profile_props = self.config_section(profile);
            return Ok(Some(
                SsoCredentialProvider::new(
                    required(section, "sso_start_url", &section_name)?,
                    required(section, "sso_region", &section_name)?,
                    required(profile_props, "sso_account_id", profile)?,
                    required(profile_props, "sso_role_name", profile)?,
                )
                .with_session_name(session),
            ));
        }

        if self.get(profile, "sso_start_url").is_some() {
            let props = self.config_section(profile);
            return Ok(Some(SsoCredentialProvider::new(
                required(props, "sso_start_url", profile)?,
                required(props, "sso_region", profile)?,
                required(props, "sso_account_id", profile)?,
                required(props, "sso_role_name", profile)?,
            )));
        }

        Ok(None)
    }
}

fn credential_from_props(props: &Properties) -> Option<Credential> {
    match (
        props.get("aws_access_key_id"),
        props.get("aws_secret_access_key"),
    ) {
        (Some(ak), Some(sk)) => Some(Credential {
            access_key_id: ak.to_string(),
            secret_access_key: sk.to_string(),
            session_token: props.get("aws_session_token").map(|s| s.to_string()),
            expires_in: None,
        }),
        _ => None,
    }
}

#[async_trait]
impl ProvideCredential for ProfileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let profile = self
            .profile
            .clone()
            .or_else(|| ctx.env_var(AWS_PROFILE))
            .unwrap_or_else(|| "default".to_string());
        let files = self.load_shared_files(ctx).await?;

        // Walk `source_profile` links down to a profile holding a credential,
        // collecting the roles to assume on the way.
        let mut hops: Vec<RoleHop> = Vec::new();
        let mut visited: Vec<String> = Vec::new();
        let mut current = profile;
        let base = loop {
            if visited.contains(&current) {
                return Err(Error::config_invalid("source_profile forms a loop")
                    .with_context(format!("profiles: {}", visited.join(" -> "))));
            }
            visited.push(current.clone());

            if !files.has_profile(&current) {
                if hops.is_empty() {
                    debug!("profile {current} not found in aws shared files");
                    return Ok(None);
                }
                return Err(Error::config_invalid("source_profile not found")
                    .with_context(format!("profile: {current}")));
            }

            let Some(role_arn) = files.get(&current, "role_arn") else {
                match self.leaf_credential(ctx, &files, &current).await? {
                    Some(cred) => break cred,
                    None if hops.is_empty() => return Ok(None),
                    None => {
                        return Err(Error::config_invalid("source_profile has no credential")
                            .with_context(format!("profile: {current}")))
                    }
                }
            };
            hops.push(RoleHop::from_profile(&files, &current, role_arn)?);

            match (
                files.get(&current, "source_profile"),
                files.get(&current, "credential_source"),
            ) {
                (Some(source), None) if source == current => {
                    // A role profile may carry the keys it assumes the role with.
                    match files.credentials_section(&current).and_then(credential_from_props) {
                        Some(cred) => break cred,
                        None => {
                            return Err(Error::config_invalid(
                                "source_profile points to itself without static keys",
                            )
                            .with_context(format!("profile: {current}")))
                        }
                    }
                }
                (Some(source), None) => current = source.to_string(),
                (None, Some("Environment")) => {
                    match EnvCredentialProvider::new().provide_credential(ctx).await? {
                        Some(cred) => break cred,
                        None => {
                            return Err(Error::credential_invalid(
                                "credential_source is Environment but no AWS keys are set",
                            )
                            .with_context(format!("profile: {current}")))
                        }
                    }
                }
                (None, Some(source)) => {
                    return Err(Error::config_invalid("unsupported credential_source")
                        .with_context(format!("profile: {current}"))
                        .with_context(format!("credential_source: {source}")))
                }
                (Some(_), Some(_)) => {
                    return Err(Error::config_invalid(
                        "source_profile and credential_source are mutually exclusive",
                    )
                    .with_context(format!("profile: {current}")))
                }
                (None, None) => {
                    return Err(Error::config_invalid(
                        "role_arn needs source_profile or credential_source",
                    )
                    .with_context(format!("profile: {current}")))
                }
            }
        };

        let mut cred = base;
        for hop in hops.into_iter().rev() {
            let mut provider = AssumeRoleCredentialProvider::new(&hop.role_arn, cred);
            if let Some(name) = hop.role_session_name {
                provider = provider.with_role_session_name(name);
            }
            if let Some(id) = hop.external_id {
                provider = provider.with_external_id(id);
            }
            if let Some(seconds) = hop.duration_seconds {
                provider = provider.with_duration_seconds(seconds);
            }
            if let Some(region) = hop.region.or_else(|| self.region.clone()) {
                provider = provider.with_region(region);
            }

            cred = provider.provide_credential(ctx).await?.ok_or_else(|| {
                Error::credential_invalid("STS returned no credential")
                    .with_context(format!("role_arn: {}", hop.role_arn))
            })?;
        }
        Ok(Some(cred))
    }
}
