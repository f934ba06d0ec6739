/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use aws_auth::provider::env::EnvironmentVariableCredentialsProvider;
use aws_auth::{AsyncProvideCredentials, CredentialsProvider};
use aws_endpoint::{
    AwsEndpointResolver, CredentialScope, DefaultAwsEndpointResolver, Endpoint, ResolveAwsEndpoint,
    StaticEndpoint,
};
use aws_http::user_agent::AwsUserAgent;
use aws_hyper::conn::HttpSettings;
use aws_hyper::RetryConfig;
use aws_sig_auth::signer::{ClockSkew, OperationSigningConfig};
use aws_types::region::{Region, SigningRegion, SigningService};
use smithy_http::property_bag::PropertyBag;
use std::fmt;
use std::sync::Arc;

/// Configuration of a [`Client`](crate::Client)
///
/// A `Config` cannot be changed once built. To talk to another region or endpoint, build
/// another client.
#[derive(Clone)]
pub struct Config {
    pub(crate) region: Region,
    pub(crate) endpoint_resolver: AwsEndpointResolver,
    pub(crate) signing_region: Option<SigningRegion>,
    pub(crate) credentials_provider: CredentialsProvider,
    pub(crate) time_offset: i64,
    pub(crate) user_agent_suffix: Option<String>,
    pub(crate) http_settings: HttpSettings,
    pub(crate) retry_config: RetryConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut config = f.debug_struct("Config");
        config
            .field("region", &self.region)
            .field("signing_region", &self.signing_region)
            .field("time_offset", &self.time_offset)
            .field("user_agent_suffix", &self.user_agent_suffix)
            .field("http_settings", &self.http_settings)
            .field("retry_config", &self.retry_config);
        config.finish()
    }
}

impl Config {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn http_settings(&self) -> &HttpSettings {
        &self.http_settings
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    /// Everything the middleware stack needs to resolve, sign and describe a request
    pub(crate) fn configure(&self, properties: &mut PropertyBag) {
        properties.insert(self.region.clone());
        aws_endpoint::set_endpoint_resolver(properties, self.endpoint_resolver.clone());
        let mut scope = CredentialScope::new().with_service(SigningService::from_static(
            crate::SIGNING_SERVICE,
        ));
        if let Some(signing_region) = &self.signing_region {
            scope = scope.with_region(signing_region.clone());
        }
        properties.insert(scope);
        aws_auth::set_provider(properties, self.credentials_provider.clone());
        properties.insert(OperationSigningConfig::default_config());
        if self.time_offset != 0 {
            properties.insert(ClockSkew(self.time_offset));
        }
        let user_agent = AwsUserAgent::new_from_environment(crate::API_METADATA.clone());
        let user_agent = match &self.user_agent_suffix {
            Some(suffix) => user_agent.with_suffix(suffix.clone()),
            None => user_agent,
        };
        properties.insert(user_agent);
    }
}

#[derive(Default)]
pub struct Builder {
    region: Option<Region>,
    endpoint_resolver: Option<AwsEndpointResolver>,
    signing_region: Option<SigningRegion>,
    credentials_provider: Option<CredentialsProvider>,
    time_offset: i64,
    user_agent_suffix: Option<String>,
    http_settings: HttpSettings,
    retry_config: Option<RetryConfig>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults to `us-east-1`
    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Send every request to `endpoint` instead of the regional endpoint
    ///
    /// `endpoint` may be a bare host (`https` is assumed) or a full URL:
    /// ```rust
    /// use aws_endpoint::Endpoint;
    /// let conf = servicediscovery::Config::builder()
    ///     .endpoint(Endpoint::parse("http://localhost:8000").unwrap())
    ///     .build();
    /// ```
    pub fn endpoint(self, endpoint: Endpoint) -> Self {
        self.endpoint_resolver(StaticEndpoint::new(endpoint))
    }

    pub fn endpoint_resolver(mut self, resolver: impl ResolveAwsEndpoint + 'static) -> Self {
        self.endpoint_resolver = Some(Arc::new(resolver));
        self
    }

    /// Sign requests for `signing_region` rather than the region of the client
    pub fn signing_region(mut self, signing_region: SigningRegion) -> Self {
        self.signing_region = Some(signing_region);
        self
    }

    /// Defaults to the `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_SESSION_TOKEN`
    /// environment variables
    pub fn credentials_provider(
        mut self,
        credentials_provider: impl AsyncProvideCredentials + 'static,
    ) -> Self {
        self.credentials_provider = Some(Arc::new(credentials_provider));
        self
    }

    /// Seconds the local clock is ahead of the service clock. Requests are signed at
    /// `now - time_offset`.
    pub fn time_offset(mut self, seconds: i64) -> Self {
        self.time_offset = seconds;
        self
    }

    pub fn user_agent_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = Some(suffix.into());
        self
    }

    /// Timeouts and proxy of the default HTTPS connection. Ignored by `Client::from_conf_conn`.
    pub fn http_settings(mut self, http_settings: HttpSettings) -> Self {
        self.http_settings = http_settings;
        self
    }

    /// Send every request of the default HTTPS connection through `proxy`
    pub fn proxy(mut self, proxy: http::Uri) -> Self {
        self.http_settings = self.http_settings.with_proxy(proxy);
        self
    }

    /// Retries are disabled unless a retry config enabling them is set
    pub fn retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = Some(retry_config);
        self
    }

    pub fn build(self) -> Config {
        Config {
            region: self
                .region
                .unwrap_or_else(|| Region::from_static(crate::DEFAULT_REGION)),
            endpoint_resolver: self.endpoint_resolver.unwrap_or_else(|| {
                Arc::new(DefaultAwsEndpointResolver::for_service(
                    crate::ENDPOINT_PREFIX,
                ))
            }),
            signing_region: self.signing_region,
            credentials_provider: self
                .credentials_provider
                .unwrap_or_else(|| Arc::new(EnvironmentVariableCredentialsProvider::new())),
            time_offset: self.time_offset,
            user_agent_suffix: self.user_agent_suffix,
            http_settings: self.http_settings,
            retry_config: self.retry_config.unwrap_or_default(),
        }
    }
}
