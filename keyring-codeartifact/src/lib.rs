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

//! Keyring backend that exchanges AWS identity for CodeArtifact tokens.
//!
//! Pip and twine talk to PyPI repositories hosted on AWS CodeArtifact with
//! short lived authorization tokens. This crate hands those tokens out
//! through the keyring protocol: the backend recognizes repository URLs,
//! looks up the matching `keyringrc.cfg` section, and asks CodeArtifact
//! (or Teleport) for a fresh token on every call.
//!
//! ## Example
//!
//! ```no_run
//! use keyring_codeartifact::{default_backend, default_context, KeyringBackend};
//!
//! # #[tokio::main]
//! # async fn main() -> keyring_codeartifact::Result<()> {
//! let ctx = default_context();
//! let backend = default_backend(&ctx, None).await;
//!
//! let password = backend
//!     .get_password(
//!         &ctx,
//!         "https://my-domain-000000000000.d.codeartifact.us-west-2.amazonaws.com/pypi/my-repo/",
//!         None,
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub use keyring_codeartifact_core::*;
pub use keyring_codeartifact_service::*;

use keyring_codeartifact_command_execute_tokio::TokioCommandExecute;
use keyring_codeartifact_file_read_tokio::TokioFileRead;
use keyring_codeartifact_http_send_reqwest::ReqwestHttpSend;

/// Environment variable holding the log filter, `info` when unset.
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// Create a context backed by tokio, reqwest and the process environment.
pub fn default_context() -> Context {
    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
        .with_command_execute(TokioCommandExecute)
}

/// Create a backend from the configuration at `config`, or at the default
/// `keyringrc.cfg` location.
pub async fn default_backend(ctx: &Context, config: Option<&str>) -> CodeArtifactBackend {
    CodeArtifactBackend::load(ctx, config).await
}

/// Install `env_logger` with the filter from `LOG_LEVEL`.
///
/// Calling it more than once is harmless.
pub fn init_logging() {
    let env = env_logger::Env::default().filter_or(LOG_LEVEL, "info");
    let _ = env_logger::Builder::from_env(env).try_init();
}
