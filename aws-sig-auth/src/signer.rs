/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use aws_auth::Credentials;
use aws_sigv4::http_request::{
    sign, PayloadChecksumKind, PercentEncodingMode, SignableBody, SignableRequest,
    SignatureLocation, SigningParams, SigningSettings,
};
use aws_types::{SigningRegion, SigningService};
use http::header::{HeaderValue, InvalidHeaderValue, HOST};
use std::error::Error;
use std::fmt;
use std::time::{Duration, SystemTime};

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum SigningAlgorithm {
    SigV4,
}

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum HttpSignatureType {
    /// A signature for a full http request should be computed, with header updates applied to the signing result.
    HttpRequestHeaders,
}

/// Signing Configuration for an Operation
///
/// Although these fields MAY be customized on a per request basis, they are generally static
/// for a given operation
#[derive(Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub struct OperationSigningConfig {
    pub algorithm: SigningAlgorithm,
    pub signature_type: HttpSignatureType,
    pub signing_options: SigningOptions,
}

impl OperationSigningConfig {
    /// The signing configuration used by every AWS JSON operation
    pub fn default_config() -> Self {
        OperationSigningConfig {
            algorithm: SigningAlgorithm::SigV4,
            signature_type: HttpSignatureType::HttpRequestHeaders,
            signing_options: SigningOptions {
                double_uri_encode: true,
                content_sha256_header: false,
            },
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
#[non_exhaustive]
pub struct SigningOptions {
    pub double_uri_encode: bool,
    pub content_sha256_header: bool,
}

/// Client-wide offset between the local clock and the service clock
///
/// When present in the property bag, requests are signed at `now - offset`. A positive offset
/// means the local clock runs ahead of the service. An offset that would move the signing time
/// outside of what `SystemTime` can represent is ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockSkew(pub i64);

impl ClockSkew {
    pub fn apply(&self, time: SystemTime) -> SystemTime {
        let offset = Duration::from_secs(self.0.unsigned_abs());
        let skewed = if self.0 >= 0 {
            time.checked_sub(offset)
        } else {
            time.checked_add(offset)
        };
        skewed.unwrap_or_else(|| {
            tracing::warn!(offset = self.0, "clock skew out of range, signing with the local clock");
            time
        })
    }
}

/// Signing Configuration for an individual Request
///
/// These fields may vary on a per-request basis
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RequestConfig<'a> {
    pub request_ts: SystemTime,
    pub region: &'a SigningRegion,
    pub service: &'a SigningService,
}

#[derive(Debug)]
pub enum SigningError {
    /// The request authority could not be written as a `host` header
    InvalidHost(InvalidHeaderValue),
    /// The request could not be canonicalized, eg. a header value that is not visible ASCII
    Unsignable(Box<dyn Error + Send + Sync + 'static>),
}

impl fmt::Display for SigningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningError::InvalidHost(_) => write!(f, "the request host is not a valid header"),
            SigningError::Unsignable(err) => write!(f, "request cannot be signed: {}", err),
        }
    }
}

impl Error for SigningError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SigningError::InvalidHost(err) => Some(err),
            SigningError::Unsignable(err) => Some(err.as_ref() as _),
        }
    }
}

/// The hex encoded signature added to the `Authorization` header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Default)]
pub struct SigV4Signer {
    _private: (),
}

impl fmt::Debug for SigV4Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigV4Signer").finish()
    }
}

impl SigV4Signer {
    pub fn new() -> Self {
        SigV4Signer { _private: () }
    }

    fn settings(operation_config: &OperationSigningConfig) -> SigningSettings {
        let mut settings = SigningSettings::default();
        settings.percent_encoding_mode = if operation_config.signing_options.double_uri_encode {
            PercentEncodingMode::Double
        } else {
            PercentEncodingMode::Single
        };
        settings.payload_checksum_kind = if operation_config.signing_options.content_sha256_header
        {
            PayloadChecksumKind::XAmzSha256
        } else {
            PayloadChecksumKind::NoHeader
        };
        settings.signature_location = match operation_config.signature_type {
            HttpSignatureType::HttpRequestHeaders => SignatureLocation::Headers,
        };
        settings
    }

    /// Sign a request using the SigV4 Protocol
    ///
    /// A `host` header is added from the URI authority when missing. `x-amz-date`,
    /// `authorization` and, for session credentials, `x-amz-security-token` are added by the
    /// signature. Signing the same request with the same timestamp always produces the same
    /// signature.
    ///
    /// Although this function may be used, end users will not typically
    /// interact with this code. It is generally used via middleware in the request pipeline. See [`SigV4SigningStage`](crate::middleware::SigV4SigningStage).
    pub fn sign<B>(
        &self,
        operation_config: &OperationSigningConfig,
        request_config: &RequestConfig<'_>,
        credentials: &Credentials,
        request: &mut http::Request<B>,
    ) -> Result<Signature, SigningError>
    where
        B: AsRef<[u8]>,
    {
        if !request.headers().contains_key(HOST) {
            if let Some(authority) = request.uri().authority() {
                let host =
                    HeaderValue::from_str(authority.as_str()).map_err(SigningError::InvalidHost)?;
                request.headers_mut().insert(HOST, host);
            }
        }

        let mut builder = SigningParams::builder()
            .access_key(credentials.access_key_id())
            .secret_key(credentials.secret_access_key())
            .region(request_config.region.as_ref())
            .service_name(request_config.service.as_ref())
            .time(request_config.request_ts)
            .settings(Self::settings(operation_config));
        builder.set_security_token(credentials.session_token());
        let params = builder
            .build()
            .map_err(|err| SigningError::Unsignable(err.into()))?;

        let (instructions, signature) = {
            let signable_request = SignableRequest::new(
                request.method(),
                request.uri(),
                request.headers(),
                SignableBody::Bytes(request.body().as_ref()),
            );
            sign(signable_request, &params).map_err(|err| SigningError::Unsignable(err.into()))?
        }
        .into_parts();
        instructions.apply_to_request(request);
        Ok(Signature(signature))
    }
}
