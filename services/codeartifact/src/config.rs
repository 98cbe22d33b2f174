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

//! Layered `keyringrc.cfg` parsing and best-match section lookup.

use std::collections::HashMap;

use ini::{Ini, ParseOption};
use keyring_codeartifact_core::{Context, Error, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::*;

/// Options of one configuration section, keyed by lower-cased name.
pub type Options = HashMap<String, String>;

/// Matches one `key=value` assignment inside a section header.
///
/// A quoted value runs to the closing quote that is followed by whitespace
/// or the end of the header. An unquoted value runs to the next whitespace.
static QUALIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?P<key>domain|account|region|name)=(?:"(?P<dq>.*?)"|'(?P<sq>.*?)'|(?P<bare>\S*))(?:$|\s)"#,
    )
    // SAFETY: the pattern is a literal known to compile.
    .expect("qualifier pattern must be valid")
});

/// The scope of a configuration section, or the identifiers of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Qualifier {
    /// CodeArtifact domain name.
    pub domain: Option<String>,
    /// Domain owner account id.
    pub account: Option<String>,
    /// AWS region.
    pub region: Option<String>,
    /// Repository name.
    pub name: Option<String>,
}

impl Qualifier {
    /// Set the domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the account id.
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the repository name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse the qualifier out of a section header such as
    /// `codeartifact account="000000000000" name=development`.
    ///
    /// Returns `None` for sections that do not start with `codeartifact`.
    pub fn from_section(header: &str) -> Option<Self> {
        let header = header.trim();
        if !header.starts_with(DEFAULT_SECTION) {
            return None;
        }

        let mut qualifier = Qualifier::default();
        for caps in QUALIFIER_RE.captures_iter(header) {
            let value = caps
                .name("dq")
                .or_else(|| caps.name("sq"))
                .or_else(|| caps.name("bare"))
                .map(|m| m.as_str().to_string());

            match caps["key"].to_ascii_lowercase().as_str() {
                "domain" => qualifier.domain = value,
                "account" => qualifier.account = value,
                "region" => qualifier.region = value,
                "name" => qualifier.name = value,
                _ => {}
            }
        }

        Some(qualifier)
    }

    /// Whether no field is set.
    pub fn is_unset(&self) -> bool {
        self.specified_fields() == 0
    }

    /// Number of fields that are set.
    pub fn specified_fields(&self) -> usize {
        self.fields().iter().filter(|v| v.is_some()).count()
    }

    /// Number of fields set on both sides with equal values.
    ///
    /// A field missing on either side never counts, so the score of two
    /// qualifiers is the same whichever side is asked.
    pub fn score(&self, other: &Qualifier) -> usize {
        self.fields()
            .into_iter()
            .zip(other.fields())
            .filter(|(a, b)| a.is_some() && a == b)
            .count()
    }

    fn fields(&self) -> [Option<&str>; 4] {
        [
            self.domain.as_deref(),
            self.account.as_deref(),
            self.region.as_deref(),
            self.name.as_deref(),
        ]
    }
}

/// Parsed keyring configuration.
///
/// `[codeartifact]` holds defaults. Every `[codeartifact ...]` section is
/// scoped by a [`Qualifier`] and falls back to the defaults for the options
/// it leaves out.
#[derive(Debug, Clone, Default)]
pub struct KeyringConfig {
    defaults: Options,
    sections: Vec<(Qualifier, Options)>,
}

impl KeyringConfig {
    /// Parse configuration from INI text.
    pub fn parse(content: &str) -> Result<Self> {
        let ini = Ini::load_from_str_opt(
            content,
            ParseOption {
                enabled_quote: false,
                enabled_escape: false,
                ..Default::default()
            },
        )
        .map_err(|e| {
            Error::config_invalid("failed to parse keyring config")
                .with_source(anyhow::Error::new(e))
        })?;

        let mut defaults = Options::new();
        let mut sections: Vec<(Qualifier, Options)> = Vec::new();

        for (name, props) in ini.iter() {
            // Keys outside of any section belong to nobody.
            let Some(name) = name else {
                continue;
            };

            let options: Options = props
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect();

            if name.trim() == DEFAULT_SECTION {
                defaults.extend(options);
                continue;
            }

            let Some(qualifier) = Qualifier::from_section(name) else {
                debug!("ignoring section [{name}] of another consumer");
                continue;
            };

            match sections.iter_mut().find(|(q, _)| *q == qualifier) {
                Some((_, existing)) => *existing = options,
                None => sections.push((qualifier, options)),
            }
        }

        for (_, options) in sections.iter_mut() {
            for (k, v) in &defaults {
                options.entry(k.clone()).or_insert_with(|| v.clone());
            }
        }

        Ok(Self { defaults, sections })
    }

    /// Load configuration from `path`.
    ///
    /// A file that can not be read or parsed yields an empty configuration.
    pub async fn load(ctx: &Context, path: &str) -> Self {
        let content = match ctx.file_read_as_string(path).await {
            Ok(content) => content,
            Err(err) => {
                warn!("failed to read keyring config {path}, using empty configuration: {err:?}");
                return Self::default();
            }
        };

        match Self::parse(&content) {
            Ok(config) => {
                debug!(
                    "loaded keyring config {path} with {} qualified sections",
                    config.sections.len()
                );
                config
            }
            Err(err) => {
                warn!("failed to parse keyring config {path}, using empty configuration: {err:?}");
                Self::default()
            }
        }
    }

    /// Options of the `[codeartifact]` section.
    pub fn defaults(&self) -> &Options {
        &self.defaults
    }

    /// Qualified sections in declaration order.
    pub fn sections(&self) -> &[(Qualifier, Options)] {
        &self.sections
    }

    /// Select the options of the section that best matches `query`.
    ///
    /// The highest score wins. Ties go to the section with the fewest
    /// specified fields, then to the one declared first. Without qualified
    /// sections, or for an unset query, the defaults are returned.
    pub fn lookup(&self, query: &Qualifier) -> Options {
        if self.sections.is_empty() || query.is_unset() {
            return self.defaults.clone();
        }

        let best = self
            .sections
            .iter()
            .enumerate()
            .min_by_key(|(idx, (candidate, _))| {
                (
                    std::cmp::Reverse(candidate.score(query)),
                    candidate.specified_fields(),
                    *idx,
                )
            })
            .map(|(_, section)| section);

        match best {
            Some((qualifier, options)) => {
                debug!("selected section {qualifier:?} for query {query:?}");
                options.clone()
            }
            None => self.defaults.clone(),
        }
    }
}

/// Location of `keyringrc.cfg`.
///
/// `KEYRING_CODEARTIFACT_CONFIG` wins when set. Otherwise this is the
/// python-keyring config root: `%LOCALAPPDATA%\Python Keyring` on Windows,
/// `$XDG_CONFIG_HOME/python_keyring` or `~/.config/python_keyring`
/// elsewhere.
pub fn default_config_path(ctx: &Context) -> Option<String> {
    if let Some(path) = ctx.env_var(KEYRING_CODEARTIFACT_CONFIG) {
        return Some(path);
    }

    if cfg!(windows) {
        return ctx
            .env_var(LOCALAPPDATA)
            .map(|dir| format!("{dir}\\Python Keyring\\keyringrc.cfg"));
    }

    match ctx.env_var(XDG_CONFIG_HOME) {
        Some(dir) if !dir.is_empty() => Some(format!("{dir}/python_keyring/keyringrc.cfg")),
        _ => ctx.expand_home_dir("~/.config/python_keyring/keyringrc.cfg"),
    }
}
