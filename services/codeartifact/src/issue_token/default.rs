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
use keyring_codeartifact_core::{Context, Result};
use log::debug;

use super::{ApiTokenIssuer, IssueToken, TeleportTokenIssuer};
use crate::token::{AuthorizationToken, TokenRequest};

/// DefaultTokenIssuer picks an issuer per request.
///
/// Sections that name a `tsh_app_name` go through Teleport, everything
/// else calls the CodeArtifact API directly.
#[derive(Debug, Default)]
pub struct DefaultTokenIssuer {
    api: ApiTokenIssuer,
    teleport: TeleportTokenIssuer,
}

impl DefaultTokenIssuer {
    /// Create a new DefaultTokenIssuer.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IssueToken for DefaultTokenIssuer {
    async fn issue_token(&self, ctx: &Context, req: &TokenRequest) -> Result<AuthorizationToken> {
        if req.config.tsh_app_name.is_some() {
            debug!("issuing token for domain {} through teleport", req.domain);
            self.teleport.issue_token(ctx, req).await
        } else {
            debug!("issuing token for domain {} through the api", req.domain);
            self.api.issue_token(ctx, req).await
        }
    }
}
