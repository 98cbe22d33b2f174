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
use keyring_codeartifact_core::{Context, ProvideCredential, Result};

use super::{EnvCredentialProvider, ProfileCredentialProvider, ProvideCredentialChain};
use crate::aws::Credential;

/// DefaultCredentialProvider loads credentials the way the AWS CLI does
/// when nothing else is configured:
///
/// 1. Environment variables
/// 2. Shared config (`~/.aws/config`, `~/.aws/credentials`), using the
///    profile named by `AWS_PROFILE` or `default`
#[derive(Debug, Default, Clone)]
pub struct DefaultCredentialProvider {
    region: Option<String>,
}

impl DefaultCredentialProvider {
    /// Create a new `DefaultCredentialProvider` instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the region used to reach STS when the profile assumes a role.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let mut profile = ProfileCredentialProvider::new();
        if let Some(region) = &self.region {
            profile = profile.with_region(region);
        }

        ProvideCredentialChain::new()
            .push(EnvCredentialProvider::new())
            .push(profile)
            .provide_credential(ctx)
            .await
    }
}
