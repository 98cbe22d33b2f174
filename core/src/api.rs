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

use crate::utils::Redact;
use crate::{Context, Error, Result};
use std::fmt::{Debug, Formatter};

/// SigningCredential is the trait used by signer as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is complete and not about to expire.
    fn is_valid(&self) -> bool;
}

/// ProvideCredential is the trait used to load a signing credential.
///
/// Returning `Ok(None)` means "nothing here", which lets a chain move on to
/// the next provider.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load credential from current env.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// SignRequest is the trait used to sign an outgoing request.
#[async_trait::async_trait]
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: Send + Sync + Unpin + 'static;

    /// Sign the request in place.
    ///
    /// A `None` credential leaves the request untouched.
    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()>;
}

/// A username/password pair handed back to the host.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordCredential {
    /// The principal name.
    pub username: String,
    /// The secret.
    pub password: String,
}

impl PasswordCredential {
    /// Create a new credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Debug for PasswordCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredential")
            .field("username", &self.username)
            .field("password", &Redact::from(&self.password))
            .finish()
    }
}

/// KeyringBackend is the protocol a host credential store uses to query a
/// backend.
///
/// Hosts keep several backends and ask them in descending `priority` order.
/// `Ok(None)` and [`ErrorKind::Unsupported`](crate::ErrorKind::Unsupported)
/// both mean "try the next backend"; any other error is fatal.
#[async_trait::async_trait]
pub trait KeyringBackend: Debug + Send + Sync + 'static {
    /// Ranking among installed backends, higher is asked first.
    fn priority(&self) -> f64;

    /// Look up the password for `service`.
    async fn get_password(
        &self,
        ctx: &Context,
        service: &str,
        username: Option<&str>,
    ) -> Result<Option<String>>;

    /// Look up a full credential pair for `service`.
    async fn get_credential(
        &self,
        ctx: &Context,
        service: &str,
        username: Option<&str>,
    ) -> Result<Option<PasswordCredential>>;

    /// Store a password.
    ///
    /// Read-only backends keep the default, which reports
    /// [`ErrorKind::Unsupported`](crate::ErrorKind::Unsupported).
    async fn set_password(
        &self,
        _ctx: &Context,
        _service: &str,
        _username: &str,
        _password: &str,
    ) -> Result<()> {
        Err(Error::unsupported("set_password is not supported by this backend"))
    }

    /// Delete a stored password.
    async fn delete_password(&self, _ctx: &Context, _service: &str, _username: &str) -> Result<()> {
        Err(Error::unsupported(
            "delete_password is not supported by this backend",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[derive(Debug)]
    struct ReadOnly;

    #[async_trait::async_trait]
    impl KeyringBackend for ReadOnly {
        fn priority(&self) -> f64 {
            1.0
        }

        async fn get_password(
            &self,
            _: &Context,
            _: &str,
            _: Option<&str>,
        ) -> Result<Option<String>> {
            Ok(None)
        }

        async fn get_credential(
            &self,
            _: &Context,
            _: &str,
            _: Option<&str>,
        ) -> Result<Option<PasswordCredential>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_keyring_backend_writes_are_unsupported() {
        let ctx = Context::new();

        let err = ReadOnly
            .set_password(&ctx, "https://example.com", "aws", "secret")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);

        let err = ReadOnly
            .delete_password(&ctx, "https://example.com", "aws")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_password_credential_debug_is_redacted() {
        let cred = PasswordCredential::new("aws", "eyJ2ZXIiOjEsImlzdSI6MTcwMDAwMDAwMH0");
        let debug = format!("{cred:?}");

        assert!(debug.contains("\"aws\""));
        assert!(debug.contains("eyJ***MH0"));
        assert!(!debug.contains("eyJ2ZXIiOjEsImlzdSI6MTcwMDAwMDAwMH0"));
    }
}
