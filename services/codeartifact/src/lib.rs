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

//! CodeArtifact keyring backend.
//!
//! Maps a PyPI repository URL to the `keyringrc.cfg` section that fits it
//! best and exchanges AWS identity for a CodeArtifact authorization token,
//! either through the `GetAuthorizationToken` API or through Teleport.

mod constants;

mod config;
pub use config::default_config_path;
pub use config::KeyringConfig;
pub use config::Options;
pub use config::Qualifier;

mod options;
pub use options::IssuerConfig;
pub use options::TlsVerify;

mod request;
pub use request::RepositoryRequest;

mod token;
pub use token::AuthorizationToken;
pub use token::TokenRequest;

pub mod aws;

mod issue_token;
pub use issue_token::ApiTokenIssuer;
pub use issue_token::DefaultTokenIssuer;
pub use issue_token::IssueToken;
pub use issue_token::TeleportTokenIssuer;

mod backend;
pub use backend::CodeArtifactBackend;
