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

//! Core components for the CodeArtifact keyring backend.
//!
//! This crate holds the runtime-agnostic pieces the backend is built from.
//!
//! ## Overview
//!
//! - **Context**: a container of the side effects a backend may perform:
//!   reading files, sending HTTP requests, reading the environment and
//!   running external commands.
//! - **Traits**: [`ProvideCredential`] loads AWS credentials,
//!   [`SignRequest`] signs a request, and [`KeyringBackend`] is the
//!   protocol a host credential store speaks with a backend.
//! - **Errors**: [`Error`] with an [`ErrorKind`] the host can branch on.
//!
//! ## Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use keyring_codeartifact_core::{
//!     Context, KeyringBackend, PasswordCredential, Result,
//! };
//!
//! #[derive(Debug)]
//! struct Fixed;
//!
//! #[async_trait]
//! impl KeyringBackend for Fixed {
//!     fn priority(&self) -> f64 {
//!         1.0
//!     }
//!
//!     async fn get_password(
//!         &self,
//!         _: &Context,
//!         _: &str,
//!         _: Option<&str>,
//!     ) -> Result<Option<String>> {
//!         Ok(Some("secret".to_string()))
//!     }
//!
//!     async fn get_credential(
//!         &self,
//!         ctx: &Context,
//!         service: &str,
//!         username: Option<&str>,
//!     ) -> Result<Option<PasswordCredential>> {
//!         let password = self.get_password(ctx, service, username).await?;
//!         Ok(password.map(|p| PasswordCredential::new("fixed", p)))
//!     }
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::CommandExecute;
pub use context::CommandOutput;
pub use context::Context;
pub use context::Env;
pub use context::FileRead;
pub use context::HttpSend;
pub use context::NoopCommandExecute;
pub use context::NoopEnv;
pub use context::NoopFileRead;
pub use context::NoopHttpSend;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{KeyringBackend, PasswordCredential, ProvideCredential, SignRequest, SigningCredential};

mod request;
pub use request::SigningRequest;
