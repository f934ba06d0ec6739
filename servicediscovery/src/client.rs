/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::{Config, Error};
use aws_auth::{Credentials, RequestCredentials};
use aws_http::json::{build_operation, JsonOperation};
use aws_hyper::conn::Standard;
use aws_hyper::{SdkError, SdkSuccess};
use smithy_http::error_table::ErrorTable;
use smithy_http::metrics::{ExecutionMetrics, Field};
use std::fmt;
use std::sync::Arc;

pub(crate) struct Handle {
    client: aws_hyper::Client<Standard>,
    conf: Config,
    errors: Arc<ErrorTable<Error>>,
}

/// Client for AWS Cloud Map
///
/// Each operation is a method returning a fluent builder; `send` executes it. Clones share one
/// connection, one configuration and one error table. Dropping the last clone releases the
/// connection pool.
///
/// ```rust,no_run
/// # async fn docs() {
/// let client = servicediscovery::Client::from_env();
/// let namespaces = client.list_namespaces().max_results(10).send().await;
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("conf", &self.handle.conf)
            .finish()
    }
}

impl Client {
    /// A client configured from the environment: `us-east-1` and environment credentials
    pub fn from_env() -> Self {
        Self::from_conf(Config::builder().build())
    }

    pub fn from_conf(conf: Config) -> Self {
        let conn = Standard::https_with_settings(conf.http_settings().clone());
        Self::from_conf_conn(conf, conn)
    }

    /// Use `conn` to send requests, eg. a custom connector or a test connection
    pub fn from_conf_conn(conf: Config, conn: Standard) -> Self {
        let client = aws_hyper::Client::new(conn).with_retry_config(conf.retry_config().clone());
        Client {
            handle: Arc::new(Handle {
                client,
                conf,
                errors: Arc::new(Error::error_table()),
            }),
        }
    }

    pub fn conf(&self) -> &Config {
        &self.handle.conf
    }
}

/// Builder for one call of the operation `O`
pub struct FluentBuilder<O: JsonOperation> {
    handle: Arc<Handle>,
    pub(crate) inner: O::Input,
    request_credentials: Option<Credentials>,
}

impl<O: JsonOperation> fmt::Debug for FluentBuilder<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluentBuilder")
            .field("operation", &O::NAME)
            .field("input", &self.inner)
            .finish()
    }
}

impl<O> FluentBuilder<O>
where
    O: JsonOperation,
    O::Input: Default,
{
    pub(crate) fn new(handle: Arc<Handle>) -> Self {
        FluentBuilder {
            handle,
            inner: Default::default(),
            request_credentials: None,
        }
    }
}

impl<O: JsonOperation> FluentBuilder<O> {
    /// Sign this call with `credentials` instead of the client's credentials provider
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.request_credentials = Some(credentials);
        self
    }

    /// Replace the whole input
    pub fn set_input(mut self, input: O::Input) -> Self {
        self.inner = input;
        self
    }

    pub fn input(&self) -> &O::Input {
        &self.inner
    }

    pub async fn send(self) -> Result<O::Output, SdkError<Error>> {
        self.send_raw().await.map(|success| success.parsed)
    }

    /// Like `send`, keeping the raw response and the call's metrics
    pub async fn send_raw(self) -> Result<SdkSuccess<O::Output>, SdkError<Error>> {
        let FluentBuilder {
            handle,
            inner,
            request_credentials,
        } = self;
        let mut metrics = ExecutionMetrics::new();
        metrics.start_event(Field::ClientExecuteTime);
        metrics.start_event(Field::RequestMarshallTime);
        let operation = build_operation::<O, Error>(crate::SERVICE, &inner, handle.errors.clone());
        metrics.end_event(Field::RequestMarshallTime);
        let mut operation = match operation {
            Ok(operation) => operation,
            Err(err) => {
                tracing::debug!(operation = O::NAME, error = %err, "failed to build request");
                metrics.end_event(Field::ClientExecuteTime);
                return Err(SdkError::construction_failure(err).with_metrics(metrics));
            }
        };
        {
            let mut properties = operation.properties_mut();
            handle.conf.configure(&mut properties);
            if let Some(credentials) = request_credentials {
                properties.insert(RequestCredentials(credentials));
            }
            properties.insert(metrics);
        }
        handle.client.call_raw(operation).await
    }
}
