/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Endpoint resolution for AWS services
//!
//! Every service has a default endpoint of the form `https://{prefix}.{region}.amazonaws.com`.
//! A client may replace it with a fixed endpoint, given either as a bare host (https is assumed)
//! or as a full URL.

use aws_types::{Region, SigningRegion, SigningService};
use http::uri::{Authority, PathAndQuery, Scheme, Uri};
use smithy_http::middleware::MapRequest;
use smithy_http::operation::Request;
use smithy_http::property_bag::PropertyBag;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// A base URI that requests are sent to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    uri: Uri,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidEndpoint {
    /// The endpoint could not be parsed as a host or a URI
    InvalidUri { endpoint: String, message: String },
    EndpointMustHaveAuthority,
}

impl Display for InvalidEndpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InvalidEndpoint::InvalidUri { endpoint, message } => {
                write!(f, "invalid endpoint `{}`: {}", endpoint, message)
            }
            InvalidEndpoint::EndpointMustHaveAuthority => {
                write!(f, "endpoint must contain a valid authority")
            }
        }
    }
}

impl Error for InvalidEndpoint {}

impl Endpoint {
    /// Create an endpoint from a URI that carries a scheme and an authority
    pub fn from_uri(uri: Uri) -> Result<Self, InvalidEndpoint> {
        if uri.authority().is_none() || uri.scheme().is_none() {
            return Err(InvalidEndpoint::EndpointMustHaveAuthority);
        }
        Ok(Endpoint { uri })
    }

    /// Parse an endpoint given as a host name (`a4b.eu-west-1.amazonaws.com`) or as a full URL
    /// (`http://localhost:8000`)
    ///
    /// ```rust
    /// use aws_endpoint::Endpoint;
    /// let endpoint = Endpoint::parse("servicediscovery.eu-west-1.amazonaws.com").unwrap();
    /// assert_eq!(endpoint.uri().scheme_str(), Some("https"));
    /// ```
    pub fn parse(endpoint: &str) -> Result<Self, InvalidEndpoint> {
        let invalid = |message: String| InvalidEndpoint::InvalidUri {
            endpoint: endpoint.to_string(),
            message,
        };
        let uri = if endpoint.contains("://") {
            Uri::from_str(endpoint).map_err(|err| invalid(err.to_string()))?
        } else {
            let authority =
                Authority::from_str(endpoint).map_err(|err| invalid(err.to_string()))?;
            Uri::builder()
                .scheme(Scheme::HTTPS)
                .authority(authority)
                .path_and_query("/")
                .build()
                .map_err(|err| invalid(err.to_string()))?
        };
        Self::from_uri(uri)
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Sets the endpoint on `uri`, keeping the path and query of the request
    ///
    /// A path on the endpoint itself is prepended to the request path.
    pub fn set_endpoint(&self, uri: &mut Uri) -> Result<(), InvalidEndpoint> {
        let authority = self
            .uri
            .authority()
            .cloned()
            .ok_or(InvalidEndpoint::EndpointMustHaveAuthority)?;
        let scheme = self
            .uri
            .scheme()
            .cloned()
            .ok_or(InvalidEndpoint::EndpointMustHaveAuthority)?;
        let path_and_query = merge_paths(&self.uri, uri);
        let path_and_query =
            PathAndQuery::from_str(&path_and_query).map_err(|err| InvalidEndpoint::InvalidUri {
                endpoint: self.uri.to_string(),
                message: err.to_string(),
            })?;
        *uri = Uri::builder()
            .scheme(scheme)
            .authority(authority)
            .path_and_query(path_and_query)
            .build()
            .map_err(|err| InvalidEndpoint::InvalidUri {
                endpoint: self.uri.to_string(),
                message: err.to_string(),
            })?;
        Ok(())
    }
}

fn merge_paths(endpoint: &Uri, uri: &Uri) -> String {
    let request = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let prefix = endpoint.path().trim_end_matches('/');
    if prefix.is_empty() {
        return request.to_string();
    }
    if request.starts_with('/') {
        format!("{}{}", prefix, request)
    } else {
        format!("{}/{}", prefix, request)
    }
}

/// Region and service to sign with, when they differ from the client's region and the endpoint prefix
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CredentialScope {
    region: Option<SigningRegion>,
    service: Option<SigningService>,
}

impl CredentialScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: SigningRegion) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_service(mut self, service: SigningService) -> Self {
        self.service = Some(service);
        self
    }

    pub fn region(&self) -> Option<&SigningRegion> {
        self.region.as_ref()
    }

    pub fn service(&self) -> Option<&SigningService> {
        self.service.as_ref()
    }

    /// Fields set on `self` win over those of `other`
    fn merge(&self, other: &CredentialScope) -> CredentialScope {
        CredentialScope {
            region: self.region.clone().or_else(|| other.region.clone()),
            service: self.service.clone().or_else(|| other.service.clone()),
        }
    }
}

/// A resolved endpoint with the credential scope it should be signed with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AwsEndpoint {
    endpoint: Endpoint,
    credential_scope: CredentialScope,
}

impl AwsEndpoint {
    pub fn new(endpoint: Endpoint, credential_scope: CredentialScope) -> Self {
        AwsEndpoint {
            endpoint,
            credential_scope,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn credential_scope(&self) -> &CredentialScope {
        &self.credential_scope
    }

    pub fn set_endpoint(&self, uri: &mut Uri) -> Result<(), InvalidEndpoint> {
        self.endpoint.set_endpoint(uri)
    }
}

/// Resolve the endpoint for a region
///
/// Implementations must be cheap to call: resolution happens once per attempt.
pub trait ResolveAwsEndpoint: Send + Sync {
    fn endpoint(&self, region: &Region) -> Result<AwsEndpoint, BoxError>;
}

/// `https://{service}.{region}.amazonaws.com`, signed with the region of the request
#[derive(Clone, Debug)]
pub struct DefaultAwsEndpointResolver {
    service: &'static str,
}

impl DefaultAwsEndpointResolver {
    pub fn for_service(service: &'static str) -> Self {
        Self { service }
    }
}

impl ResolveAwsEndpoint for DefaultAwsEndpointResolver {
    fn endpoint(&self, region: &Region) -> Result<AwsEndpoint, BoxError> {
        let endpoint = Endpoint::parse(&format!(
            "https://{}.{}.amazonaws.com",
            self.service,
            region.as_ref()
        ))?;
        Ok(AwsEndpoint::new(
            endpoint,
            CredentialScope::new().with_service(SigningService::from_static(self.service)),
        ))
    }
}

/// A fixed endpoint, used regardless of region
#[derive(Clone, Debug)]
pub struct StaticEndpoint {
    endpoint: Endpoint,
    credential_scope: CredentialScope,
}

impl StaticEndpoint {
    pub fn new(endpoint: Endpoint) -> Self {
        StaticEndpoint {
            endpoint,
            credential_scope: CredentialScope::default(),
        }
    }

    /// See [`Endpoint::parse`]
    pub fn parse(endpoint: &str) -> Result<Self, InvalidEndpoint> {
        Endpoint::parse(endpoint).map(Self::new)
    }

    pub fn with_credential_scope(mut self, credential_scope: CredentialScope) -> Self {
        self.credential_scope = credential_scope;
        self
    }
}

impl ResolveAwsEndpoint for StaticEndpoint {
    fn endpoint(&self, _region: &Region) -> Result<AwsEndpoint, BoxError> {
        Ok(AwsEndpoint::new(
            self.endpoint.clone(),
            self.credential_scope.clone(),
        ))
    }
}

pub type AwsEndpointResolver = Arc<dyn ResolveAwsEndpoint>;

pub fn get_endpoint_resolver(config: &PropertyBag) -> Option<&AwsEndpointResolver> {
    config.get()
}

pub fn set_endpoint_resolver(config: &mut PropertyBag, provider: AwsEndpointResolver) {
    config.insert(provider);
}

/// Middleware Stage to Add an Endpoint to a Request
///
/// AwsEndpointStage implements [`MapRequest`](smithy_http::middleware::MapRequest). It will:
/// 1. Load an endpoint provider from the property bag.
/// 2. Load an endpoint given the [`Region`](aws_types::Region) in the property bag.
/// 3. Apply the endpoint to the URI in the request
/// 4. Set the `SigningRegion` and `SigningService` in the property bag to drive downstream
/// signing middleware.
///
/// A [`CredentialScope`] stored in the property bag is a client-level override and wins over the
/// scope reported by the endpoint.
#[derive(Clone, Debug)]
pub struct AwsEndpointStage;

#[derive(Debug)]
pub enum AwsEndpointStageError {
    NoEndpointResolver,
    NoRegion,
    EndpointResolutionError(BoxError),
    InvalidEndpoint(InvalidEndpoint),
}

impl Display for AwsEndpointStageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AwsEndpointStageError::NoEndpointResolver => {
                write!(f, "No endpoint resolver in the property bag")
            }
            AwsEndpointStageError::NoRegion => write!(f, "No region in the property bag"),
            AwsEndpointStageError::EndpointResolutionError(err) => {
                write!(f, "Failed to resolve the endpoint: {}", err)
            }
            AwsEndpointStageError::InvalidEndpoint(err) => write!(f, "{}", err),
        }
    }
}

impl Error for AwsEndpointStageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AwsEndpointStageError::EndpointResolutionError(err) => Some(err.as_ref()),
            AwsEndpointStageError::InvalidEndpoint(err) => Some(err),
            _ => None,
        }
    }
}

impl MapRequest for AwsEndpointStage {
    type Error = AwsEndpointStageError;

    fn apply(&self, request: Request) -> Result<Request, Self::Error> {
        request.augment(|mut http_req, config| {
            let provider =
                get_endpoint_resolver(config).ok_or(AwsEndpointStageError::NoEndpointResolver)?;
            let region = config
                .get::<Region>()
                .ok_or(AwsEndpointStageError::NoRegion)?;
            let endpoint = provider
                .endpoint(region)
                .map_err(AwsEndpointStageError::EndpointResolutionError)?;
            tracing::debug!(endpoint = ?endpoint, base_region = ?region, "resolved endpoint");
            let scope = match config.get::<CredentialScope>() {
                Some(overrides) => overrides.merge(endpoint.credential_scope()),
                None => endpoint.credential_scope().clone(),
            };
            let signing_region = scope
                .region()
                .cloned()
                .unwrap_or_else(|| region.clone().into());
            config.insert::<SigningRegion>(signing_region);
            if let Some(signing_service) = scope.service() {
                config.insert::<SigningService>(signing_service.clone());
            }
            endpoint
                .set_endpoint(http_req.uri_mut())
                .map_err(AwsEndpointStageError::InvalidEndpoint)?;
            Ok(http_req)
        })
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use http::Uri;

    use aws_types::{Region, SigningRegion, SigningService};
    use smithy_http::body::SdkBody;
    use smithy_http::middleware::MapRequest;
    use smithy_http::operation;

    use crate::{
        set_endpoint_resolver, AwsEndpointStage, AwsEndpointStageError, CredentialScope,
        DefaultAwsEndpointResolver, Endpoint, InvalidEndpoint, StaticEndpoint,
    };

    fn request(region: &'static str) -> operation::Request {
        let req = http::Request::builder()
            .uri("/")
            .body(SdkBody::from(""))
            .unwrap();
        let mut req = operation::Request::new(req);
        req.properties_mut().insert(Region::new(region));
        req
    }

    #[test]
    fn default_endpoint_updates_request() {
        let mut req = request("us-east-1");
        set_endpoint_resolver(
            &mut req.properties_mut(),
            Arc::new(DefaultAwsEndpointResolver::for_service("a4b")),
        );
        let req = AwsEndpointStage.apply(req).expect("should succeed");
        assert_eq!(
            req.properties().get(),
            Some(&SigningRegion::from(Region::new("us-east-1")))
        );
        assert_eq!(
            req.properties().get(),
            Some(&SigningService::from_static("a4b"))
        );

        let (req, _conf) = req.into_parts();
        assert_eq!(
            req.uri(),
            &Uri::from_static("https://a4b.us-east-1.amazonaws.com/")
        );
    }

    #[test]
    fn bare_host_assumes_https() {
        let endpoint = Endpoint::parse("servicediscovery.eu-west-1.amazonaws.com").unwrap();
        assert_eq!(
            endpoint.uri(),
            &Uri::from_static("https://servicediscovery.eu-west-1.amazonaws.com/")
        );
    }

    #[test]
    fn full_url_keeps_scheme_and_port() {
        let mut uri = Uri::from_static("/?foo=bar");
        Endpoint::parse("http://localhost:8000")
            .unwrap()
            .set_endpoint(&mut uri)
            .unwrap();
        assert_eq!(uri, Uri::from_static("http://localhost:8000/?foo=bar"));
    }

    #[test]
    fn endpoint_path_is_prepended() {
        let mut uri = Uri::from_static("/");
        Endpoint::parse("https://proxy.example.com/a4b")
            .unwrap()
            .set_endpoint(&mut uri)
            .unwrap();
        assert_eq!(uri, Uri::from_static("https://proxy.example.com/a4b/"));
    }

    #[test]
    fn invalid_endpoints_are_rejected() {
        assert!(matches!(
            Endpoint::parse("not a host"),
            Err(InvalidEndpoint::InvalidUri { .. })
        ));
        assert_eq!(
            Endpoint::from_uri(Uri::from_static("/just/a/path")),
            Err(InvalidEndpoint::EndpointMustHaveAuthority)
        );
    }

    #[test]
    fn static_endpoint_ignores_region() {
        let mut req = request("eu-west-1");
        req.properties_mut()
            .insert(SigningService::from_static("servicediscovery"));
        set_endpoint_resolver(
            &mut req.properties_mut(),
            Arc::new(StaticEndpoint::parse("http://localhost:8000").unwrap()),
        );
        let req = AwsEndpointStage.apply(req).expect("should succeed");
        assert_eq!(
            req.properties().get(),
            Some(&SigningRegion::from_static("eu-west-1"))
        );
        assert_eq!(req.http().uri(), &Uri::from_static("http://localhost:8000/"));
    }

    #[test]
    fn signing_region_override_wins() {
        let mut req = request("us-east-1");
        {
            let mut conf = req.properties_mut();
            set_endpoint_resolver(
                &mut conf,
                Arc::new(DefaultAwsEndpointResolver::for_service("a4b")),
            );
            conf.insert(
                CredentialScope::new().with_region(SigningRegion::from_static("us-west-2")),
            );
        }
        let req = AwsEndpointStage.apply(req).expect("should succeed");
        assert_eq!(
            req.properties().get(),
            Some(&SigningRegion::from_static("us-west-2"))
        );
        assert_eq!(
            req.properties().get(),
            Some(&SigningService::from_static("a4b"))
        );
    }

    #[test]
    fn missing_region_is_an_error() {
        let req = operation::Request::new(http::Request::new(SdkBody::from("")));
        assert!(matches!(
            AwsEndpointStage.apply(req),
            Err(AwsEndpointStageError::NoEndpointResolver)
        ));
    }
}
