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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in aws services.
pub const X_AMZ_CONTENT_SHA_256: &str = "x-amz-content-sha256";
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

// Env values used in aws services.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
pub const AWS_PROFILE: &str = "AWS_PROFILE";
pub const AWS_CONFIG_FILE: &str = "AWS_CONFIG_FILE";
pub const AWS_SHARED_CREDENTIALS_FILE: &str = "AWS_SHARED_CREDENTIALS_FILE";

// Env values used to locate the keyring configuration.
pub const KEYRING_CODEARTIFACT_CONFIG: &str = "KEYRING_CODEARTIFACT_CONFIG";
pub const XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";
pub const LOCALAPPDATA: &str = "LOCALAPPDATA";

/// Name of the section holding default options, and the prefix of every
/// qualified section.
pub const DEFAULT_SECTION: &str = "codeartifact";

/// Username reported with every credential.
pub const PRINCIPAL: &str = "aws";

/// Backend priority, above the generic fallbacks a host ships with.
pub const PRIORITY: f64 = 9.9;

/// Token lifetime asked for when `token_duration` is not configured.
pub const DEFAULT_TOKEN_DURATION: u64 = 3600;

/// Signing name of the CodeArtifact API.
pub const CODEARTIFACT_SERVICE: &str = "codeartifact";

/// Signing name and API version of STS.
pub const STS_SERVICE: &str = "sts";
pub const STS_API_VERSION: &str = "2011-06-15";

/// Region whose STS endpoint is used when a profile names none.
pub const DEFAULT_STS_REGION: &str = "us-east-1";

/// Lifetime asked for when assuming a role without `duration_seconds`.
pub const DEFAULT_ASSUME_ROLE_DURATION: u32 = 3600;

/// Header carrying the SSO access token.
pub const X_AMZ_SSO_BEARER_TOKEN: &str = "x-amz-sso_bearer_token";

/// Teleport CLI.
pub const TSH_PROGRAM: &str = "tsh";

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html)
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static AWS_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html)
///
/// But used in query.
pub static AWS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
