/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! The AWS JSON 1.1 protocol
//!
//! Every operation is a `POST /` whose body is the JSON serialization of the input and whose
//! target is named by the `X-Amz-Target` header. Successful responses carry the JSON output.
//! Failed responses carry an error code and a message that are classified through the service's
//! [`ErrorTable`](smithy_http::error_table::ErrorTable).

use crate::AwsErrorRetryPolicy;
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use smithy_http::body::SdkBody;
use smithy_http::error_table::ErrorTable;
use smithy_http::operation::{self, BuildError, Metadata, Operation};
use smithy_http::response::ParseStrictResponse;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

pub const CONTENT_TYPE_JSON_1_1: &str = "application/x-amz-json-1.1";
const X_AMZ_TARGET: &str = "x-amz-target";
const X_AMZN_ERRORTYPE: &str = "x-amzn-errortype";
const X_AMZN_REQUESTID: &str = "x-amzn-requestid";

/// Static description of one operation of a JSON service
///
/// Implementations are zero-sized markers generated by
/// [`json_operations!`](crate::json_operations).
pub trait JsonOperation: Send + Sync + 'static {
    /// Wire name of the operation, used in `X-Amz-Target`
    const NAME: &'static str;
    type Input: Serialize + Clone + fmt::Debug + Send + Sync + 'static;
    type Output: DeserializeOwned + Send + Sync + 'static;

    /// Check that every required member of the input is set
    fn validate(input: &Self::Input) -> Result<(), BuildError>;
}

/// Service-wide protocol settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsonService {
    /// Prefix of `X-Amz-Target`, eg. `AlexaForBusiness`
    pub target_prefix: &'static str,
    /// Name of the service as reported in operation metadata
    pub service_name: &'static str,
}

/// Convert a typed input into an HTTP request
///
/// The request has a relative URI: the endpoint stage fills in the scheme and authority.
pub fn marshal<T: Serialize>(
    target_prefix: &str,
    operation: &str,
    input: &T,
) -> Result<http::Request<SdkBody>, BuildError> {
    let body = serde_json::to_vec(input)
        .map_err(|err| BuildError::SerializationError(Box::new(err)))?;
    let body = if body.is_empty() || body == b"null" {
        b"{}".to_vec()
    } else {
        body
    };
    let target = HeaderValue::from_str(&format!("{}.{}", target_prefix, operation)).map_err(
        |err| BuildError::InvalidField {
            field: "x-amz-target",
            details: err.to_string(),
        },
    )?;
    let request = http::Request::builder()
        .method(http::Method::POST)
        .uri("/")
        .header(CONTENT_TYPE, CONTENT_TYPE_JSON_1_1)
        .header(X_AMZ_TARGET, target)
        .body(SdkBody::from(body))?;
    Ok(request)
}

/// Validate and marshal `input`, wrapping it in an operation that parses responses with `errors`
pub fn build_operation<O, E>(
    service: JsonService,
    input: &O::Input,
    errors: Arc<ErrorTable<E>>,
) -> Result<Operation<JsonResponseHandler<O, E>, AwsErrorRetryPolicy>, BuildError>
where
    O: JsonOperation,
{
    O::validate(input)?;
    let request = marshal(service.target_prefix, O::NAME, input)?;
    let operation = Operation::new(
        operation::Request::new(request),
        JsonResponseHandler::new(errors),
    )
    .with_metadata(Metadata::new(O::NAME, service.service_name))
    .with_retry_policy(AwsErrorRetryPolicy::new());
    Ok(operation)
}

/// Parses the code, message and request id out of an error response
///
/// The code comes from the `X-Amzn-Errortype` header when present, otherwise from `__type` or
/// `code` in the body. Namespaces (`aws.protocoltests#FooError`) and trailing URIs
/// (`FooError:http://internal.amazon.com/...`) are stripped. A body that is not JSON still
/// produces an error, with no code.
pub fn parse_generic_error(response: &http::Response<Bytes>) -> smithy_types::Error {
    let body: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(response.body()).unwrap_or_default();
    let field = |names: &[&str]| {
        names
            .iter()
            .filter_map(|name| body.get(*name))
            .find_map(|value| value.as_str())
            .map(|value| value.to_string())
    };

    let mut err = smithy_types::Error::builder();
    let code = response
        .headers()
        .get(X_AMZN_ERRORTYPE)
        .and_then(|value| value.to_str().ok())
        .map(|code| code.to_string())
        .or_else(|| field(&["__type", "code"]));
    if let Some(code) = code {
        err.code(sanitize_error_code(&code));
    }
    if let Some(message) = field(&["message", "Message", "errorMessage"]) {
        err.message(message);
    }
    if let Some(request_id) = request_id(response) {
        err.request_id(request_id);
    }
    err.build()
}

fn request_id<B>(response: &http::Response<B>) -> Option<&str> {
    response
        .headers()
        .get(X_AMZN_REQUESTID)
        .and_then(|value| value.to_str().ok())
}

fn sanitize_error_code(error_code: &str) -> &str {
    // Trim a trailing URL from the error code, which is done by removing the longest suffix
    // beginning with a `:`
    let error_code = match error_code.find(':') {
        Some(idx) => &error_code[..idx],
        None => error_code,
    };

    // Trim a prefixing namespace from the error code, beginning with a `#`
    match error_code.find('#') {
        Some(idx) => &error_code[idx + 1..],
        None => error_code,
    }
}

/// Response handler shared by every operation of a JSON service
///
/// 2xx responses deserialize into the operation output; an empty body reads as `{}`. Every
/// other status is classified through the error table, falling back to the unhandled error
/// when the code is not registered. A 2xx body that does not deserialize also produces the
/// unhandled error, with the parser's message.
pub struct JsonResponseHandler<O, E> {
    errors: Arc<ErrorTable<E>>,
    _operation: PhantomData<fn() -> O>,
}

impl<O, E> JsonResponseHandler<O, E> {
    pub fn new(errors: Arc<ErrorTable<E>>) -> Self {
        JsonResponseHandler {
            errors,
            _operation: PhantomData,
        }
    }
}

impl<O, E> Clone for JsonResponseHandler<O, E> {
    fn clone(&self) -> Self {
        Self::new(self.errors.clone())
    }
}

impl<O, E> fmt::Debug for JsonResponseHandler<O, E>
where
    O: JsonOperation,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonResponseHandler")
            .field("operation", &O::NAME)
            .field("errors", &self.errors)
            .finish()
    }
}

impl<O, E> ParseStrictResponse for JsonResponseHandler<O, E>
where
    O: JsonOperation,
{
    type Output = Result<O::Output, E>;

    fn parse(&self, response: &http::Response<Bytes>) -> Self::Output {
        if !response.status().is_success() {
            let generic = parse_generic_error(response);
            return Err(self.errors.classify(generic, response.body()));
        }
        let body: &[u8] = if response.body().is_empty() {
            b"{}"
        } else {
            response.body()
        };
        serde_json::from_slice(body).map_err(|err| {
            tracing::debug!(operation = O::NAME, error = %err, "failed to parse response body");
            let mut generic = smithy_types::Error::builder();
            generic.message(format!("failed to parse {} response: {}", O::NAME, err));
            if let Some(request_id) = request_id(response) {
                generic.request_id(request_id);
            }
            self.errors.unhandled(generic.build())
        })
    }
}
