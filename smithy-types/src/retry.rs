/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! This module defines types that describe when to retry given a response.
//!
//! The request pipeline never retries on its own. These types exist so that callers (or an outer
//! retry wrapper) can branch on the category of a failure without parsing strings.
//!
//! The AWS classifier (`aws_http::AwsErrorRetryPolicy`) picks a [`RetryKind`] for every failed
//! call, first match wins:
//!
//! | Failure | `RetryKind` |
//! |---|---|
//! | request never built (missing field, no credentials) | `NotRetryable` |
//! | no response received (connect error, timeout) | `Error(TransientError)` |
//! | response body could not be read | `Error(TransientError)` |
//! | `x-amz-retry-after: <millis>` header | `Explicit(millis)` |
//! | [`ProvideErrorKind::error_kind`] of the modeled error | `Error(kind)` |
//! | throttling code, eg. `RequestLimitExceeded`, `ThrottlingException` | `Error(ThrottlingError)` |
//! | `RequestTimeout`, `RequestTimeoutException` | `Error(TransientError)` |
//! | HTTP 500, 502, 503 or 504 | `Error(TransientError)` |
//! | anything else | `NotRetryable` |
//!
//! The optional retry wrapper charges its token bucket more for a `TransientError` than for the
//! other kinds and refunds it on success.

use std::time::Duration;

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum ErrorKind {
    /// This is a connection level error such as a socket timeout, socket connect error,
    /// tls negotiation timeout etc...
    ///
    /// Typically these should never be applied for non-idempotent request types
    /// since in this scenario, it's impossible to know whether the operation had
    /// a side effect on the server.
    ///
    /// TransientErrors are not currently modeled. They are determined based on specific provider
    /// level errors & response status code.
    TransientError,

    /// An error where the server explicitly told the client to back off, such as a 429 or 503 HTTP error.
    ThrottlingError,

    /// Server error that isn't explicitly throttling but is considered by the client
    /// to be something that should be retried.
    ServerError,

    /// Doesn't count against any budgets. This could be something like a 401 challenge in Http.
    ClientError,
}

/// Reports the retry category of a modeled error
///
/// An error whose model carries a retry trait returns its kind here and the status code of the
/// response is never consulted:
///
/// ```
/// use smithy_types::retry::{ErrorKind, ProvideErrorKind};
///
/// struct RequestLimitExceeded;
///
/// impl ProvideErrorKind for RequestLimitExceeded {
///     fn error_kind(&self) -> Option<ErrorKind> {
///         Some(ErrorKind::ThrottlingError)
///     }
///
///     fn code(&self) -> Option<&str> {
///         Some("RequestLimitExceeded")
///     }
/// }
///
/// assert_eq!(RequestLimitExceeded.error_kind(), Some(ErrorKind::ThrottlingError));
/// ```
pub trait ProvideErrorKind {
    /// Returns the `ErrorKind`.
    ///
    /// If the error kind cannot be determined (eg. the error is unmodeled and the error kind depends
    /// on an HTTP status code), return `None`.
    fn error_kind(&self) -> Option<ErrorKind>;

    /// Returns the `code` for this error if one exists
    fn code(&self) -> Option<&str>;
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum RetryKind {
    /// Retry due to a specific `ErrorKind`
    Error(ErrorKind),

    /// An Explicit retry (eg. from `x-amz-retry-after`).
    ///
    /// Note: The specified `Duration` is considered a suggestion and may be ignored. For example:
    /// - No retry tokens are available.
    /// - The retry duration exceeds that maximum backoff configured by the client.
    Explicit(Duration),

    /// This response should not be retried
    NotRetryable,
}
