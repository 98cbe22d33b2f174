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

//! Exchanging AWS identity for a CodeArtifact authorization token.

use std::fmt::Debug;

use async_trait::async_trait;
use keyring_codeartifact_core::{Context, Result};

use crate::token::{AuthorizationToken, TokenRequest};

mod api;
pub use api::ApiTokenIssuer;

mod teleport;
pub use teleport::TeleportTokenIssuer;

mod default;
pub use default::DefaultTokenIssuer;

/// IssueToken obtains one authorization token per call.
///
/// Issuers never cache and never retry; a failure is returned as is.
#[async_trait]
pub trait IssueToken: Debug + Send + Sync + 'static {
    /// Ask for a token for the repository described by `req`.
    async fn issue_token(&self, ctx: &Context, req: &TokenRequest) -> Result<AuthorizationToken>;
}
