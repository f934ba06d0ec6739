/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

pub mod json;
mod macros;
pub mod user_agent;

use smithy_http::result::{SdkError, SdkSuccess};
use smithy_http::retry::ClassifyResponse;
use smithy_types::retry::{ErrorKind, ProvideErrorKind, RetryKind};
use std::time::Duration;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
    pub use smithy_http;
    pub use smithy_types;
}

/// A retry policy that models AWS error codes as outlined in the SEP
///
/// In order of priority:
/// 1. The `x-amz-retry-after` header is checked
/// 2. The modeled error retry mode is checked
/// 3. The code is checked against a predetermined list of throttling errors & transient error codes
/// 4. The status code is checked against a predetermined list of status codes
///
/// Failures that never produced a response are classified without a response: construction
/// failures are never retryable and dispatch failures are always transient.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct AwsErrorRetryPolicy;

const TRANSIENT_ERROR_STATUS_CODES: [u16; 4] = [500, 502, 503, 504];
const THROTTLING_ERRORS: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "RequestThrottledException",
    "TooManyRequestsException",
    "ProvisionedThroughputExceededException",
    "TransactionInProgressException",
    "RequestLimitExceeded",
    "BandwidthLimitExceeded",
    "LimitExceededException",
    "RequestThrottled",
    "SlowDown",
    "PriorRequestNotComplete",
    "EC2ThrottledException",
];
const TRANSIENT_ERRORS: &[&str] = &["RequestTimeout", "RequestTimeoutException"];

impl AwsErrorRetryPolicy {
    /// Create an `AwsErrorRetryPolicy` with the default set of known error & status codes
    pub fn new() -> Self {
        AwsErrorRetryPolicy
    }

    /// Classify a service error given the response it was parsed from
    pub fn classify_response<E, B>(&self, err: &E, response: &http::Response<B>) -> RetryKind
    where
        E: ProvideErrorKind,
    {
        if let Some(retry_after_delay) = response
            .headers()
            .get("x-amz-retry-after")
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.parse::<u64>().ok())
        {
            return RetryKind::Explicit(Duration::from_millis(retry_after_delay));
        }
        if let Some(kind) = err.error_kind() {
            return RetryKind::Error(kind);
        };
        if let Some(code) = err.code() {
            if THROTTLING_ERRORS.contains(&code) {
                return RetryKind::Error(ErrorKind::ThrottlingError);
            }
            if TRANSIENT_ERRORS.contains(&code) {
                return RetryKind::Error(ErrorKind::TransientError);
            }
        };
        if TRANSIENT_ERROR_STATUS_CODES.contains(&response.status().as_u16()) {
            return RetryKind::Error(ErrorKind::TransientError);
        };
        RetryKind::NotRetryable
    }

    /// Classify any failure of the request pipeline
    pub fn classify_error<E>(&self, err: &SdkError<E>) -> RetryKind
    where
        E: ProvideErrorKind,
    {
        match err {
            SdkError::ConstructionFailure { .. } => RetryKind::NotRetryable,
            SdkError::DispatchFailure { .. } => RetryKind::Error(ErrorKind::TransientError),
            SdkError::ResponseError { .. } => RetryKind::Error(ErrorKind::TransientError),
            SdkError::ServiceError { err, raw } => self.classify_response(err, raw.http()),
        }
    }
}

impl Default for AwsErrorRetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> ClassifyResponse<SdkSuccess<T>, SdkError<E>> for AwsErrorRetryPolicy
where
    E: ProvideErrorKind,
{
    fn classify(&self, response: Result<&SdkSuccess<T>, &SdkError<E>>) -> RetryKind {
        match response {
            Ok(_) => RetryKind::NotRetryable,
            Err(err) => self.classify_error(err),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::AwsErrorRetryPolicy;
    use smithy_http::body::SdkBody;
    use smithy_http::operation;
    use smithy_http::result::{SdkError, SdkSuccess};
    use smithy_http::retry::ClassifyResponse;
    use smithy_types::retry::{ErrorKind, ProvideErrorKind, RetryKind};
    use std::time::Duration;

    #[derive(Debug)]
    struct UnmodeledError;

    #[derive(Debug)]
    struct CodedError {
        code: &'static str,
    }

    impl ProvideErrorKind for UnmodeledError {
        fn error_kind(&self) -> Option<ErrorKind> {
            None
        }

        fn code(&self) -> Option<&str> {
            None
        }
    }

    impl ProvideErrorKind for CodedError {
        fn error_kind(&self) -> Option<ErrorKind> {
            None
        }

        fn code(&self) -> Option<&str> {
            Some(self.code)
        }
    }

    fn service_error<E>(err: E, status: u16) -> SdkError<E> {
        let raw = http::Response::builder()
            .status(status)
            .body(SdkBody::from("error!"))
            .unwrap();
        SdkError::ServiceError {
            err,
            raw: operation::Response::new(raw),
        }
    }

    #[test]
    fn not_an_error() {
        let policy = AwsErrorRetryPolicy::new();
        let success = SdkSuccess {
            raw: operation::Response::new(http::Response::new(SdkBody::from("OK"))),
            parsed: (),
        };
        assert_eq!(
            ClassifyResponse::<_, SdkError<UnmodeledError>>::classify(&policy, Ok(&success)),
            RetryKind::NotRetryable
        );
    }

    #[test]
    fn classify_by_response_status() {
        let policy = AwsErrorRetryPolicy::new();
        assert_eq!(
            policy.classify_error(&service_error(UnmodeledError, 503)),
            RetryKind::Error(ErrorKind::TransientError)
        );
        assert_eq!(
            policy.classify_error(&service_error(UnmodeledError, 400)),
            RetryKind::NotRetryable
        );
    }

    #[test]
    fn classify_by_error_code() {
        let policy = AwsErrorRetryPolicy::new();

        assert_eq!(
            policy.classify_error(&service_error(CodedError { code: "Throttling" }, 400)),
            RetryKind::Error(ErrorKind::ThrottlingError)
        );

        assert_eq!(
            policy.classify_error(&service_error(
                CodedError {
                    code: "RequestTimeout"
                },
                400
            )),
            RetryKind::Error(ErrorKind::TransientError)
        )
    }

    #[test]
    fn classify_generic() {
        let err = smithy_types::Error::builder().code("SlowDown").build();
        let policy = AwsErrorRetryPolicy::new();
        assert_eq!(
            policy.classify_error(&service_error(err, 400)),
            RetryKind::Error(ErrorKind::ThrottlingError)
        );
    }

    #[test]
    fn classify_by_error_kind() {
        #[derive(Debug)]
        struct ModeledRetries;
        impl ProvideErrorKind for ModeledRetries {
            fn error_kind(&self) -> Option<ErrorKind> {
                Some(ErrorKind::ClientError)
            }

            fn code(&self) -> Option<&str> {
                // code should not be called when `error_kind` is provided
                unimplemented!()
            }
        }

        let policy = AwsErrorRetryPolicy::new();

        assert_eq!(
            policy.classify_error(&service_error(ModeledRetries, 400)),
            RetryKind::Error(ErrorKind::ClientError)
        );
    }

    #[test]
    fn test_retry_after_header() {
        let policy = AwsErrorRetryPolicy::new();
        let test_response = http::Response::builder()
            .header("x-amz-retry-after", "5000")
            .body("retry later")
            .unwrap();

        assert_eq!(
            policy.classify_response(&UnmodeledError, &test_response),
            RetryKind::Explicit(Duration::from_millis(5000))
        );
    }

    #[test]
    fn failures_without_a_response() {
        let policy = AwsErrorRetryPolicy::new();
        let dispatch: SdkError<UnmodeledError> = SdkError::dispatch_failure("connection reset");
        assert_eq!(
            policy.classify_error(&dispatch),
            RetryKind::Error(ErrorKind::TransientError)
        );
        let construction: SdkError<UnmodeledError> = SdkError::construction_failure("missing field");
        assert_eq!(policy.classify_error(&construction), RetryKind::NotRetryable);
    }
}
