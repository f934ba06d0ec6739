/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use http::header::{HeaderName, InvalidHeaderValue, USER_AGENT};
use http::HeaderValue;
use lazy_static::lazy_static;
use smithy_http::middleware::MapRequest;
use smithy_http::operation::Request;
use std::borrow::Cow;
use std::convert::TryFrom;
use std::fmt;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// AWS User Agent
///
/// Ths struct should be inserted into the [`PropertyBag`](smithy_http::operation::Request::properties)
/// during operation construction. [`UserAgentStage`](UserAgentStage) reads `AwsUserAgent`
/// from the property bag and sets the `User-Agent` and `x-amz-user-agent` headers.
#[derive(Clone, Debug)]
pub struct AwsUserAgent {
    sdk_metadata: SdkMetadata,
    api_metadata: ApiMetadata,
    os: &'static str,
    suffix: Option<Cow<'static, str>>,
}

impl AwsUserAgent {
    /// Build a user agent for the current platform
    pub fn new_from_environment(api_metadata: ApiMetadata) -> Self {
        AwsUserAgent {
            sdk_metadata: SdkMetadata {
                name: "aws-sdk-rust",
                version: env!("CARGO_PKG_VERSION"),
            },
            api_metadata,
            os: std::env::consts::OS,
            suffix: None,
        }
    }

    /// For test purposes, construct an environment-independent User Agent
    ///
    /// Without this, running CI on a different platform would produce different user agent strings
    pub fn for_tests() -> Self {
        AwsUserAgent {
            sdk_metadata: SdkMetadata {
                name: "aws-sdk-rust",
                version: "0.123.test",
            },
            api_metadata: ApiMetadata {
                service_id: "test-service".into(),
                version: "0.123",
            },
            os: "windows",
            suffix: None,
        }
    }

    /// Free-form text appended to both headers, separated by a space
    pub fn with_suffix(mut self, suffix: impl Into<Cow<'static, str>>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Generate a new-style user agent style header
    ///
    /// This header should be set at `x-amz-user-agent`
    pub fn aws_ua_header(&self) -> String {
        let mut ua = format!(
            "{} {} os/{}",
            self.sdk_metadata, self.api_metadata, self.os
        );
        if let Some(suffix) = &self.suffix {
            ua.push(' ');
            ua.push_str(suffix);
        }
        ua
    }

    /// Generate an old-style User-Agent header for backward compatibility
    ///
    /// This header is intended to be set at `User-Agent`
    pub fn ua_header(&self) -> String {
        self.aws_ua_header()
    }
}

#[derive(Clone, Copy, Debug)]
struct SdkMetadata {
    name: &'static str,
    version: &'static str,
}

impl Display for SdkMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

#[derive(Clone, Debug)]
pub struct ApiMetadata {
    service_id: Cow<'static, str>,
    version: &'static str,
}

impl ApiMetadata {
    pub const fn new(service_id: &'static str, version: &'static str) -> Self {
        Self {
            service_id: Cow::Borrowed(service_id),
            version,
        }
    }
}

impl Display for ApiMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "api/{}/{}", self.service_id, self.version)
    }
}

#[non_exhaustive]
#[derive(Default, Clone, Debug)]
pub struct UserAgentStage;

impl UserAgentStage {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Error)]
pub enum UserAgentStageError {
    #[error("User agent missing from property bag")]
    UserAgentMissing,
    #[error("Provided user agent header was invalid")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

lazy_static! {
    static ref X_AMZ_USER_AGENT: HeaderName = HeaderName::from_static("x-amz-user-agent");
}

impl MapRequest for UserAgentStage {
    type Error = UserAgentStageError;

    fn apply(&self, request: Request) -> Result<Request, Self::Error> {
        request.augment(|mut req, conf| {
            let ua = conf
                .get::<AwsUserAgent>()
                .ok_or(UserAgentStageError::UserAgentMissing)?;
            req.headers_mut()
                .insert(USER_AGENT, HeaderValue::try_from(ua.ua_header())?);
            req.headers_mut().insert(
                X_AMZ_USER_AGENT.clone(),
                HeaderValue::try_from(ua.aws_ua_header())?,
            );

            Ok(req)
        })
    }
}

#[cfg(test)]
mod test {
    use crate::user_agent::{
        ApiMetadata, AwsUserAgent, UserAgentStage, UserAgentStageError, X_AMZ_USER_AGENT,
    };
    use http::header::USER_AGENT;
    use smithy_http::body::SdkBody;
    use smithy_http::middleware::MapRequest;
    use smithy_http::operation;

    #[test]
    fn generate_a_valid_ua() {
        let ua = AwsUserAgent::for_tests();
        assert_eq!(
            ua.aws_ua_header(),
            "aws-sdk-rust/0.123.test api/test-service/0.123 os/windows"
        );
        assert_eq!(
            ua.with_suffix("my-app/1.0").ua_header(),
            "aws-sdk-rust/0.123.test api/test-service/0.123 os/windows my-app/1.0"
        );
    }

    #[test]
    fn environment_ua_names_the_service() {
        let ua = AwsUserAgent::new_from_environment(ApiMetadata::new("servicediscovery", "0.1.0"));
        let header = ua.aws_ua_header();
        assert!(header.starts_with("aws-sdk-rust/"));
        assert!(header.contains(" api/servicediscovery/0.1.0 os/"));
    }

    #[test]
    fn ua_stage_adds_headers() {
        let stage = UserAgentStage::new();
        let req = operation::Request::new(http::Request::new(SdkBody::from("some body")));
        assert!(
            matches!(stage.apply(req), Err(UserAgentStageError::UserAgentMissing)),
            "stage should fail when no user agent is present"
        );

        let mut req = operation::Request::new(http::Request::new(SdkBody::from("some body")));
        req.properties_mut()
            .insert(AwsUserAgent::for_tests().with_suffix("suffix"));
        let req = stage.apply(req).expect("setting user agent should succeed");
        let (req, _) = req.into_parts();
        req.headers()
            .get(USER_AGENT)
            .expect("UA header should be set");
        assert_eq!(
            req.headers()[&*X_AMZ_USER_AGENT],
            "aws-sdk-rust/0.123.test api/test-service/0.123 os/windows suffix"
        );
    }
}
