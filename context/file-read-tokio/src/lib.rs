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

//! Tokio-based file reading for the keyring context.
//!
//! Used to read `keyringrc.cfg`, the shared AWS credential files and CA
//! bundles named by the `verify` option.
//!
//! ```no_run
//! use keyring_codeartifact_core::Context;
//! use keyring_codeartifact_file_read_tokio::TokioFileRead;
//!
//! # async fn example() -> keyring_codeartifact_core::Result<()> {
//! let ctx = Context::new().with_file_read(TokioFileRead);
//! let content = ctx.file_read_as_string("/etc/hosts").await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use keyring_codeartifact_core::{Error, FileRead, Result};

/// Tokio-based implementation of the `FileRead` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| {
            Error::unexpected("failed to read file")
                .with_source(e)
                .with_context(format!("path: {path}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_read_existing_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "[codeartifact]")?;

        let path = file.path().to_string_lossy().to_string();
        let content = TokioFileRead.file_read(&path).await?;
        assert_eq!(content, b"[codeartifact]\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = TokioFileRead
            .file_read("/definitely/not/here/keyringrc.cfg")
            .await
            .unwrap_err();
        assert_eq!(
            err.context(),
            &["path: /definitely/not/here/keyringrc.cfg".to_string()]
        );
    }
}
