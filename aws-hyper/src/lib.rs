/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! The generic AWS client
//!
//! [`Client::call`] drives one [`Operation`] through the middleware stack:
//!
//! 1. the endpoint is resolved and the signing scope recorded
//! 2. user agent headers are set
//! 3. credentials are loaded, a per-request override winning over the client-wide provider
//! 4. the request is signed with SigV4
//! 5. the request is dispatched over the connector `S`
//! 6. the response is read and classified by the operation's response handler
//!
//! Every stage runs exactly once per call. Retries only happen when a [`RetryConfig`] enabling
//! them is installed, and then the whole stack runs again for each attempt.

pub mod conn;
mod retry;
pub mod test_connection;

pub use retry::RetryConfig;
pub use smithy_http::result::{SdkError, SdkSuccess};

use crate::conn::Standard;
use crate::retry::{RetryCtx, StandardRetryStrategy};
use aws_auth::middleware::CredentialsStage;
use aws_endpoint::AwsEndpointStage;
use aws_http::user_agent::UserAgentStage;
use aws_sig_auth::middleware::SigV4SigningStage;
use aws_sig_auth::signer::SigV4Signer;
use smithy_http::body::SdkBody;
use smithy_http::metrics::{self, ExecutionMetrics, Field};
use smithy_http::operation::Operation;
use smithy_http::property_bag::lock;
use smithy_http::response::ParseHttpResponse;
use smithy_http::retry::ClassifyResponse;
use smithy_http_tower::dispatch::DispatchLayer;
use smithy_http_tower::map_request::{AsyncMapRequestLayer, MapRequestLayer};
use smithy_http_tower::parse_response::ParseResponseLayer;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tower::{Service, ServiceBuilder, ServiceExt};
use tracing::{debug, debug_span, Instrument};

pub type BoxError = Box<dyn Error + Send + Sync>;

/// AWS Service Client
///
/// Hyper-based AWS Service Client. Most customers will want to construct a client with
/// [`Client::https`](Client::https). For testing & other more advanced use cases, a custom
/// connector may be used via [`Client::new(connector)`](Client::new).
///
/// The connector is shared by every call made through the client and must be safe to use from
/// concurrent calls. The client holds no other mutable state: metrics live in each call's
/// property bag, and only the retry token bucket (when retries are enabled) is shared.
#[derive(Debug)]
pub struct Client<S> {
    inner: S,
    retry: Option<Arc<Mutex<RetryCtx>>>,
}

impl<S> Client<S> {
    /// Construct a new `Client` with a custom connector
    pub fn new(connector: S) -> Self {
        Client {
            inner: connector,
            retry: None,
        }
    }

    /// Wrap every call in an outer retry loop
    ///
    /// [`RetryConfig::disabled`](RetryConfig::disabled) (the default) removes the wrapper.
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry = if retry_config.is_enabled() {
            Some(Arc::new(Mutex::new(RetryCtx::new(retry_config))))
        } else {
            None
        };
        self
    }
}

impl Client<Standard> {
    /// Construct an `https` based client
    pub fn https() -> Self {
        Client::new(Standard::https())
    }
}

impl<S> Client<S>
where
    S: Service<http::Request<SdkBody>, Response = http::Response<hyper::Body>>
        + Send
        + Clone
        + 'static,
    S::Error: Into<BoxError> + Send + Sync + 'static,
    S::Future: Send + 'static,
{
    /// Dispatch this request to the network
    ///
    /// For ergonomics, this does not include the raw response for successful responses. To
    /// access the raw response use `call_raw`.
    pub async fn call<O, T, E, Retry>(&self, input: Operation<O, Retry>) -> Result<T, SdkError<E>>
    where
        O: ParseHttpResponse<Output = Result<T, E>> + Send + Sync + Clone + 'static,
        Retry: ClassifyResponse<SdkSuccess<T>, SdkError<E>> + Send + Sync + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        self.call_raw(input).await.map(|res| res.parsed)
    }

    /// Dispatch this request to the network
    ///
    /// The returned result contains the raw HTTP response which can be useful for debugging or
    /// implementing unsupported features. Its property bag holds the call's
    /// [`ExecutionMetrics`](smithy_http::metrics::ExecutionMetrics).
    pub async fn call_raw<O, T, E, Retry>(
        &self,
        input: Operation<O, Retry>,
    ) -> Result<SdkSuccess<T>, SdkError<E>>
    where
        O: ParseHttpResponse<Output = Result<T, E>> + Send + Sync + Clone + 'static,
        Retry: ClassifyResponse<SdkSuccess<T>, SdkError<E>> + Send + Sync + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let operation_name = input
            .metadata()
            .map(|metadata| metadata.name().to_string())
            .unwrap_or_default();
        let properties = input.request().properties_handle();
        {
            let mut properties = lock(&properties);
            if properties.get::<ExecutionMetrics>().is_none() {
                properties.insert(ExecutionMetrics::new());
            }
            // façades that marshal before calling start the clock themselves
            let started = properties
                .get::<ExecutionMetrics>()
                .map_or(false, |m| m.is_running(Field::ClientExecuteTime));
            if !started {
                metrics::start_event(&mut properties, Field::ClientExecuteTime);
            }
        }

        let svc = ServiceBuilder::new()
            .layer(ParseResponseLayer::<O, Retry>::new())
            .layer(MapRequestLayer::for_mapper(AwsEndpointStage))
            .layer(MapRequestLayer::for_mapper(UserAgentStage::new()))
            .layer(AsyncMapRequestLayer::for_mapper(CredentialsStage::new()))
            .layer(MapRequestLayer::for_mapper(SigV4SigningStage::new(
                SigV4Signer::new(),
            )))
            .layer(DispatchLayer::new())
            .service(self.inner.clone());

        let span = debug_span!("call", operation = %operation_name);
        let result = match &self.retry {
            Some(ctx) => {
                let strategy = StandardRetryStrategy::new(ctx.clone());
                tower::retry::Retry::new(strategy, svc)
                    .oneshot(input)
                    .instrument(span)
                    .await
            }
            None => svc.oneshot(input).instrument(span).await,
        };

        let mut properties = lock(&properties);
        metrics::end_event(&mut properties, Field::ClientExecuteTime);
        let snapshot = properties.get::<ExecutionMetrics>().cloned();
        if let Some(metrics) = &snapshot {
            debug!(
                operation = %operation_name,
                success = result.is_ok(),
                metrics = %metrics,
                "call complete"
            );
        }
        match (result, snapshot) {
            // failures without a response have no property bag of their own
            (Err(err), Some(snapshot)) => Err(err.with_metrics(snapshot)),
            (result, _) => result,
        }
    }
}

impl<S: Clone> Clone for Client<S> {
    fn clone(&self) -> Self {
        Client {
            inner: self.inner.clone(),
            retry: self.retry.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Client, RetryConfig};

    #[test]
    fn retries_are_opt_in() {
        let client = Client::new(());
        assert!(client.retry.is_none());
        let client = client.with_retry_config(RetryConfig::standard());
        assert!(client.retry.is_some());
        let client = client.with_retry_config(RetryConfig::disabled());
        assert!(client.retry.is_none());
    }

    #[test]
    fn https_client_is_send_and_sync() {
        fn check<T: Send + Sync>() {}
        check::<Client<crate::conn::Standard>>();
    }
}
