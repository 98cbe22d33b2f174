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

//! Reqwest-based HTTP sending for the keyring context.
//!
//! Besides the plain client, this crate can build clients that honor the
//! `verify` option of a keyring section: skipping certificate validation,
//! or trusting a PEM bundle instead of the built-in roots.
//!
//! ```no_run
//! use keyring_codeartifact_core::Context;
//! use keyring_codeartifact_http_send_reqwest::ReqwestHttpSend;
//!
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use keyring_codeartifact_core::{Error, HttpSend, Result};
use reqwest::{Certificate, Client, Request};

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a client that does not validate server certificates.
    pub fn danger_accept_invalid_certs() -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| Error::unexpected("failed to build http client").with_source(e))?;
        Ok(Self { client })
    }

    /// Create a client that trusts only the certificates in `pem`.
    ///
    /// The built-in roots are dropped, so a private CA bundle behaves like
    /// `verify = <path>` of botocore.
    pub fn with_root_certificates(pem: &[u8]) -> Result<Self> {
        let certs = Certificate::from_pem_bundle(pem).map_err(|e| {
            Error::config_invalid("failed to parse CA bundle").with_source(e)
        })?;
        if certs.is_empty() {
            return Err(Error::config_invalid("CA bundle contains no certificate"));
        }

        let builder = certs
            .into_iter()
            .fold(Client::builder().tls_built_in_root_certs(false), |builder, cert| {
                builder.add_root_certificate(cert)
            });
        let client = builder
            .build()
            .map_err(|e| Error::unexpected("failed to build http client").with_source(e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert http request").with_source(e))?;
        let url = req.url().to_string();

        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| {
                Error::unexpected("failed to send http request")
                    .with_source(e)
                    .with_context(format!("url: {url}"))
            })?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| {
                Error::unexpected("failed to read http response body")
                    .with_source(e)
                    .with_context(format!("url: {url}"))
            })?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyring_codeartifact_core::ErrorKind;

    const CA_PEM: &[u8] = include_bytes!("../testdata/ca.pem");

    #[test]
    fn test_root_certificates_from_bundle() {
        assert!(ReqwestHttpSend::with_root_certificates(CA_PEM).is_ok());
    }

    #[test]
    fn test_root_certificates_skips_text_around_certs() {
        let mut pem = b"# private CA\n".to_vec();
        pem.extend_from_slice(CA_PEM);
        assert!(ReqwestHttpSend::with_root_certificates(&pem).is_ok());
    }

    #[test]
    fn test_root_certificates_rejects_empty_bundle() {
        let err = ReqwestHttpSend::with_root_certificates(b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_root_certificates_rejects_garbage() {
        let err = ReqwestHttpSend::with_root_certificates(b"not a certificate").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_danger_accept_invalid_certs_builds() {
        assert!(ReqwestHttpSend::danger_accept_invalid_certs().is_ok());
    }
}
