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

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::config::Qualifier;

// SAFETY: both patterns are literals known to compile.
static HOST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+)-([0-9]{12})\.d\.codeartifact\.([^.]+)\.amazonaws\.com$")
        .expect("host pattern must be valid")
});
static PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/pypi/([^/]+)/?$").expect("path pattern must be valid"));

/// Identifiers of a CodeArtifact PyPI repository, taken from its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRequest {
    /// CodeArtifact domain name.
    pub domain: String,
    /// Domain owner account id.
    pub account: String,
    /// AWS region.
    pub region: String,
    /// Repository name.
    pub name: String,
}

impl RepositoryRequest {
    /// Decompose a service URL such as
    /// `https://my-domain-000000000000.d.codeartifact.us-west-2.amazonaws.com/pypi/my-repo/`.
    ///
    /// Returns `None` when the URL does not point to a CodeArtifact PyPI
    /// repository. Hosts outside `amazonaws.com` are skipped quietly.
    pub fn from_url(service: &str) -> Option<Self> {
        let url = match Url::parse(service) {
            Ok(url) => url,
            Err(err) => {
                debug!("service {service} is not a url: {err}");
                return None;
            }
        };

        let host = url.host_str()?.to_ascii_lowercase();
        if !host.ends_with(".amazonaws.com") {
            return None;
        }

        let Some(host_caps) = HOST_RE.captures(&host) else {
            warn!("not an AWS CodeArtifact repository url: {host}");
            return None;
        };

        let Some(path_caps) = PATH_RE.captures(url.path()) else {
            warn!("invalid CodeArtifact PyPI path: {}", url.path());
            return None;
        };

        Some(Self {
            domain: host_caps[1].to_string(),
            account: host_caps[2].to_string(),
            region: host_caps[3].to_string(),
            name: path_caps[1].to_string(),
        })
    }

    /// Qualifier to look the configuration up with.
    pub fn qualifier(&self) -> Qualifier {
        Qualifier::default()
            .with_domain(&self.domain)
            .with_account(&self.account)
            .with_region(&self.region)
            .with_name(&self.name)
    }
}
