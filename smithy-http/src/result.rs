/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::metrics::ExecutionMetrics;
use crate::operation;
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

type BoxError = Box<dyn Error + Send + Sync>;

/// Successful Sdk Result
///
/// `raw` is the response as received from the transport. Its property bag still holds the
/// [`ExecutionMetrics`](crate::metrics::ExecutionMetrics) of the call that produced it.
#[derive(Debug)]
pub struct SdkSuccess<O> {
    pub raw: operation::Response,
    pub parsed: O,
}

impl<O> SdkSuccess<O> {
    /// A snapshot of the metrics recorded while this call executed
    pub fn metrics(&self) -> Option<ExecutionMetrics> {
        self.raw.properties().get::<ExecutionMetrics>().cloned()
    }
}

/// Failing Sdk Result
///
/// Every failed call maps to exactly one of these categories. The categories let a caller decide
/// whether a failure is worth retrying without inspecting messages.
#[derive(Debug)]
pub enum SdkError<E> {
    /// The request failed during construction. It was not dispatched over the network.
    ///
    /// Marshalling failures (missing or invalid fields) and credential resolution failures land
    /// here. `metrics` is attached once the call completes.
    ConstructionFailure {
        err: BoxError,
        metrics: Option<ExecutionMetrics>,
    },

    /// The request failed during dispatch. An HTTP response was not received. The request MAY
    /// have been sent.
    DispatchFailure {
        err: BoxError,
        metrics: Option<ExecutionMetrics>,
    },

    /// A response was received but it was not parseable according the the protocol (for example
    /// the server hung up while the body was being read)
    ResponseError {
        err: BoxError,
        raw: operation::Response,
    },

    /// An error response was received from the service
    ServiceError { err: E, raw: operation::Response },
}

impl<E> SdkError<E> {
    pub fn construction_failure(err: impl Into<BoxError>) -> Self {
        SdkError::ConstructionFailure {
            err: err.into(),
            metrics: None,
        }
    }

    pub fn dispatch_failure(err: impl Into<BoxError>) -> Self {
        SdkError::DispatchFailure {
            err: err.into(),
            metrics: None,
        }
    }

    /// Attach a metrics snapshot to a failure that never produced a response
    ///
    /// Errors carrying a raw response already hold their metrics in its property bag and are
    /// returned unchanged.
    pub fn with_metrics(self, snapshot: ExecutionMetrics) -> Self {
        match self {
            SdkError::ConstructionFailure { err, .. } => SdkError::ConstructionFailure {
                err,
                metrics: Some(snapshot),
            },
            SdkError::DispatchFailure { err, .. } => SdkError::DispatchFailure {
                err,
                metrics: Some(snapshot),
            },
            other => other,
        }
    }

    /// Returns the raw response if one was received
    pub fn raw_response(&self) -> Option<&operation::Response> {
        match self {
            SdkError::ResponseError { raw, .. } | SdkError::ServiceError { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// A snapshot of the metrics recorded before the call failed
    pub fn metrics(&self) -> Option<ExecutionMetrics> {
        match self {
            SdkError::ConstructionFailure { metrics, .. }
            | SdkError::DispatchFailure { metrics, .. } => metrics.clone(),
            SdkError::ResponseError { raw, .. } | SdkError::ServiceError { raw, .. } => {
                raw.properties().get::<ExecutionMetrics>().cloned()
            }
        }
    }

    /// Consumes the error, returning the modeled service error if there is one
    pub fn into_service_error(self) -> Option<E> {
        match self {
            SdkError::ServiceError { err, .. } => Some(err),
            _ => None,
        }
    }
}

impl<E> Display for SdkError<E>
where
    E: Error,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SdkError::ConstructionFailure { err, .. } => {
                write!(f, "failed to construct request: {}", err)
            }
            SdkError::DispatchFailure { err, .. } => write!(f, "dispatch failure: {}", err),
            SdkError::ResponseError { err, .. } => write!(f, "response error: {}", err),
            SdkError::ServiceError { err, .. } => write!(f, "service error: {}", err),
        }
    }
}

impl<E> Error for SdkError<E>
where
    E: Error + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SdkError::ConstructionFailure { err: e, .. }
            | SdkError::DispatchFailure { err: e, .. }
            | SdkError::ResponseError { err: e, .. } => Some(e.as_ref()),
            SdkError::ServiceError { err, .. } => Some(err),
        }
    }
}
