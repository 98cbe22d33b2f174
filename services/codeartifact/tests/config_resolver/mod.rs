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

use std::collections::HashMap;

use keyring_codeartifact_service::{KeyringConfig, Options, Qualifier};
use pretty_assertions::assert_eq;
use test_case::test_case;

use super::{fixture, init_test_context};

async fn load(name: &str) -> KeyringConfig {
    KeyringConfig::load(&init_test_context(), &fixture(name)).await
}

fn options(pairs: &[(&str, &str)]) -> Options {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<_, _>>()
}

#[tokio::test]
async fn test_single_section_applies_to_everything() {
    let config = load("single_section.cfg").await;

    let expected = options(&[
        ("token_duration", "1800"),
        ("profile_name", "default_profile"),
        ("aws_access_key_id", "default_access_key"),
        ("aws_secret_key_id", "default_secret_key"),
    ]);

    assert_eq!(config.lookup(&Qualifier::default()), expected);
    assert_eq!(
        config.lookup(
            &Qualifier::default()
                .with_domain("any")
                .with_account("111111111111")
                .with_region("eu-west-1")
                .with_name("repo")
        ),
        expected
    );
}

#[test_case(
    Qualifier::default().with_account("000000000000"),
    &[
        ("token_duration", "600"),
        ("aws_access_key_id", "not_access_key"),
        ("aws_secret_key_id", "not_secret_key"),
    ];
    "account only"
)]
#[test_case(
    Qualifier::default().with_domain("specific"),
    &[("token_duration", "1800"), ("profile_name", "domain_specific")];
    "domain only"
)]
#[test_case(
    Qualifier::default().with_account("000000000000").with_name("development"),
    &[("token_duration", "1800"), ("profile_name", "development_profile")];
    "account and name"
)]
#[test_case(
    Qualifier::default()
        .with_domain("specific")
        .with_account("000000000000")
        .with_region("us-west-2")
        .with_name("production"),
    &[("token_duration", "1800"), ("profile_name", "production_profile")];
    "full repository"
)]
#[test_case(
    Qualifier::default().with_region("us-west-2"),
    &[
        ("token_duration", "600"),
        ("aws_access_key_id", "not_access_key"),
        ("aws_secret_key_id", "not_secret_key"),
    ];
    "no match falls back to first least specific section"
)]
#[tokio::test]
async fn test_multiple_sections_with_default(query: Qualifier, expected: &[(&str, &str)]) {
    let config = load("multiple_sections_with_default.cfg").await;

    assert_eq!(config.lookup(&query), options(expected));
}

#[test_case(
    Qualifier::default().with_account("000000000000").with_name("development"),
    Some("development_profile");
    "development"
)]
#[test_case(
    Qualifier::default().with_account("000000000000").with_name("testing"),
    Some("testing_profile");
    "testing"
)]
#[test_case(
    Qualifier::default().with_name("production"),
    Some("production_profile");
    "name only"
)]
#[tokio::test]
async fn test_multiple_sections_no_default(query: Qualifier, profile: Option<&str>) {
    let config = load("multiple_sections_no_default.cfg").await;

    let options = config.lookup(&query);
    assert_eq!(options.get("profile_name").map(String::as_str), profile);
    assert_eq!(options.get("token_duration"), None);
}

#[test_case(""; "empty")]
#[test_case("[other]\ntoken_duration = 1800\n"; "foreign section")]
#[test_case("[codeartifact]\n"; "header only")]
fn test_bogus_config_resolves_to_nothing(content: &str) {
    let config = KeyringConfig::parse(content).expect("config must parse");

    let query = Qualifier::default()
        .with_domain("domain")
        .with_account("000000000000")
        .with_region("us-west-2")
        .with_name("repo");
    assert_eq!(config.lookup(&query), Options::new());
}

#[tokio::test]
async fn test_missing_file_resolves_to_nothing() {
    let config = load("does_not_exist.cfg").await;

    assert!(config.sections().is_empty());
    assert_eq!(
        config.lookup(&Qualifier::default().with_name("repo")),
        Options::new()
    );
}
