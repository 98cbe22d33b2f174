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

use std::env;

use anyhow::Result;
use keyring_codeartifact_command_execute_tokio::TokioCommandExecute;
use keyring_codeartifact_core::{Context, KeyringBackend, OsEnv};
use keyring_codeartifact_http_send_reqwest::ReqwestHttpSend;
use keyring_codeartifact_service::CodeArtifactBackend;
use log::{debug, warn};

fn init_live_test() -> Option<(Context, String)> {
    let _ = env_logger::builder().is_test(true).try_init();

    if env::var("KEYRING_CODEARTIFACT_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let url = env::var("KEYRING_CODEARTIFACT_TEST_URL")
        .expect("env KEYRING_CODEARTIFACT_TEST_URL must set");
    let ctx = super::init_test_context()
        .with_http_send(ReqwestHttpSend::default())
        .with_command_execute(TokioCommandExecute)
        .with_env(OsEnv);
    Some((ctx, url))
}

#[tokio::test]
async fn test_get_password_from_codeartifact() -> Result<()> {
    let Some((ctx, url)) = init_live_test() else {
        warn!("KEYRING_CODEARTIFACT_TEST is not set, skipped");
        return Ok(());
    };

    let config = env::var("KEYRING_CODEARTIFACT_TEST_CONFIG").ok();
    let backend = CodeArtifactBackend::load(&ctx, config.as_deref()).await;

    let cred = backend
        .get_credential(&ctx, &url, None)
        .await?
        .expect("token must be issued");
    debug!("got credential: {cred:?}");

    assert_eq!(cred.username, "aws");
    assert!(!cred.password.is_empty());
    Ok(())
}
