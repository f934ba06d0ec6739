/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::provider::{CredentialsError, CredentialsProvider};
use crate::{Credentials, RequestCredentials};
use smithy_http::metrics::{self, Field};
use smithy_http::middleware::{AsyncMapRequest, BoxFuture};
use smithy_http::operation::Request;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tracing::debug;

/// Middleware stage that loads credentials into the property bag
///
/// A [`RequestCredentials`](crate::RequestCredentials) override in the bag wins; otherwise the
/// client-wide [`CredentialsProvider`](crate::provider::CredentialsProvider) is asked. The
/// resolved [`Credentials`](crate::Credentials) are stored for the signing stage. Resolution is
/// timed as `CredentialsRequestTime` and runs on every attempt, so nothing is reused across calls
/// unless the provider itself caches.
#[derive(Clone, Default)]
#[non_exhaustive]
pub struct CredentialsStage;

impl CredentialsStage {
    pub fn new() -> Self {
        CredentialsStage
    }
}

#[derive(Debug)]
pub enum CredentialsStageError {
    MissingCredentialsProvider,
    CredentialsLoadingError(CredentialsError),
}

impl Display for CredentialsStageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use CredentialsStageError::*;
        match self {
            MissingCredentialsProvider => {
                write!(f, "No credentials provider in the property bag")
            }
            CredentialsLoadingError(err) => write!(
                f,
                "Failed to load credentials from the credentials provider: {}",
                err
            ),
        }
    }
}

impl Error for CredentialsStageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CredentialsStageError::CredentialsLoadingError(err) => Some(err),
            CredentialsStageError::MissingCredentialsProvider => None,
        }
    }
}

enum Source {
    Override(Credentials),
    Provider(CredentialsProvider),
}

impl AsyncMapRequest for CredentialsStage {
    type Error = CredentialsStageError;
    type Future = BoxFuture<Request, Self::Error>;

    fn apply(&self, mut request: Request) -> Self::Future {
        Box::pin(async move {
            // the property bag lock is released before the provider is awaited
            let source = {
                let mut properties = request.properties_mut();
                metrics::start_event(&mut properties, Field::CredentialsRequestTime);
                match properties.get::<RequestCredentials>() {
                    Some(RequestCredentials(creds)) => Some(Source::Override(creds.clone())),
                    None => properties
                        .get::<CredentialsProvider>()
                        .cloned()
                        .map(Source::Provider),
                }
            };
            let credentials = match source {
                Some(Source::Override(creds)) => {
                    debug!(provider = creds.provider_name(), "using request credentials");
                    Ok(creds)
                }
                Some(Source::Provider(provider)) => provider
                    .provide_credentials()
                    .await
                    .map_err(CredentialsStageError::CredentialsLoadingError),
                None => Err(CredentialsStageError::MissingCredentialsProvider),
            };
            {
                let mut properties = request.properties_mut();
                metrics::end_event(&mut properties, Field::CredentialsRequestTime);
            }
            let credentials = credentials?;
            debug!(provider = credentials.provider_name(), "loaded credentials");
            request.properties_mut().insert(credentials);
            Ok(request)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CredentialsStage, CredentialsStageError};
    use crate::provider::{
        set_provider, AsyncProvideCredentials, CredentialsError, CredentialsResult,
    };
    use crate::{Credentials, RequestCredentials};
    use smithy_http::body::SdkBody;
    use smithy_http::metrics::{ExecutionMetrics, Field};
    use smithy_http::middleware::AsyncMapRequest;
    use smithy_http::operation;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingProvider(AtomicUsize);

    impl AsyncProvideCredentials for CountingProvider {
        fn provide_credentials(
            &self,
        ) -> Pin<Box<dyn Future<Output = CredentialsResult> + Send>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Box::pin(async {
                tokio::task::yield_now().await;
                Ok(Credentials::from_keys("provider-akid", "provider-secret", None))
            })
        }
    }

    fn request() -> operation::Request {
        let mut req = operation::Request::new(http::Request::new(SdkBody::from("some body")));
        req.properties_mut().insert(ExecutionMetrics::new());
        req
    }

    #[tokio::test]
    async fn no_credential_provider_is_an_error() {
        let req = request();
        let err = CredentialsStage::new()
            .apply(req)
            .await
            .expect_err("no credentials provider");
        assert!(matches!(err, CredentialsStageError::MissingCredentialsProvider));
    }

    #[tokio::test]
    async fn provider_failures_are_surfaced() {
        struct Broken;
        impl crate::provider::ProvideCredentials for Broken {
            fn provide_credentials(&self) -> Result<Credentials, CredentialsError> {
                Err(CredentialsError::CredentialsNotLoaded)
            }
        }
        let mut req = request();
        set_provider(&mut req.properties_mut(), Arc::new(Broken));
        let err = CredentialsStage::new()
            .apply(req)
            .await
            .expect_err("provider failed");
        assert!(matches!(
            err,
            CredentialsStageError::CredentialsLoadingError(CredentialsError::CredentialsNotLoaded)
        ));
    }

    #[tokio::test]
    async fn provider_credentials_are_stored_and_timed() {
        let provider = Arc::new(CountingProvider::default());
        let mut req = request();
        set_provider(&mut req.properties_mut(), provider.clone());
        let req = CredentialsStage::new()
            .apply(req)
            .await
            .expect("credentials provider is set");
        let properties = req.properties();
        let creds = properties.get::<Credentials>().expect("credentials stored");
        assert_eq!(creds.access_key_id(), "provider-akid");
        let metrics = properties.get::<ExecutionMetrics>().expect("metrics present");
        assert_eq!(metrics.timings(Field::CredentialsRequestTime).count(), 1);
        assert_eq!(provider.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn request_override_wins_over_provider() {
        let provider = Arc::new(CountingProvider::default());
        let mut req = request();
        set_provider(&mut req.properties_mut(), provider.clone());
        req.properties_mut().insert(RequestCredentials(Credentials::from_keys(
            "override-akid",
            "override-secret",
            Some("override-token".to_string()),
        )));
        let req = CredentialsStage::new()
            .apply(req)
            .await
            .expect("override present");
        let properties = req.properties();
        let creds = properties.get::<Credentials>().expect("credentials stored");
        assert_eq!(creds.access_key_id(), "override-akid");
        assert_eq!(creds.session_token(), Some("override-token"));
        assert_eq!(provider.0.load(Ordering::SeqCst), 0);
    }
}
