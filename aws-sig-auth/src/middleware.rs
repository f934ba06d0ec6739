/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::signer::{ClockSkew, OperationSigningConfig, RequestConfig, SigV4Signer, SigningError};
use aws_auth::Credentials;
use aws_types::{SigningRegion, SigningService};
use smithy_http::metrics::{self, Field};
use smithy_http::middleware::MapRequest;
use smithy_http::operation::Request;
use smithy_http::property_bag::PropertyBag;
use std::time::SystemTime;
use thiserror::Error;

/// Middleware stage to sign requests with SigV4
///
/// SigV4SigningStage will load configuration from the request property bag and add
/// a signature.
///
/// Prior to signing, the following fields MUST be present in the property bag:
/// - [`SigningRegion`](SigningRegion): The region used when signing the request, eg. `us-east-1`
/// - [`SigningService`](SigningService): The name of the service to use when signing the request, eg. `a4b`
/// - [`Credentials`](Credentials): Resolved by [`CredentialsStage`](aws_auth::middleware::CredentialsStage)
/// - [`OperationSigningConfig`](OperationSigningConfig): Operation specific signing configuration, eg.
///   changes to URL encoding behavior, or headers that must be omitted.
/// If any of these fields are missing, the middleware will return an error.
///
/// The following fields MAY be present in the property bag:
/// - [`SystemTime`](SystemTime): The timestamp to use when signing the request. If this field is not present
///   [`SystemTime::now`](SystemTime::now) will be used.
/// - [`ClockSkew`](ClockSkew): subtracted from the signing timestamp.
#[derive(Clone, Debug)]
pub struct SigV4SigningStage {
    signer: SigV4Signer,
}

impl SigV4SigningStage {
    pub fn new(signer: SigV4Signer) -> Self {
        Self { signer }
    }
}

#[derive(Debug, Error)]
pub enum SigningStageError {
    #[error("No credentials in the property bag")]
    MissingCredentials,
    #[error("No signing region in the property bag")]
    MissingSigningRegion,
    #[error("No signing service in the property bag")]
    MissingSigningService,
    #[error("No signing configuration in the property bag")]
    MissingSigningConfig,
    #[error("The request body could not be signed by this configuration")]
    InvalidBodyType,
    #[error("Signing failed")]
    SigningFailure(#[from] SigningError),
}

/// Extract a signing config from a [`PropertyBag`](smithy_http::property_bag::PropertyBag)
fn signing_config(
    config: &PropertyBag,
) -> Result<(&OperationSigningConfig, RequestConfig, &Credentials), SigningStageError> {
    let operation_config = config
        .get::<OperationSigningConfig>()
        .ok_or(SigningStageError::MissingSigningConfig)?;
    let creds = config
        .get::<Credentials>()
        .ok_or(SigningStageError::MissingCredentials)?;
    let region = config
        .get::<SigningRegion>()
        .ok_or(SigningStageError::MissingSigningRegion)?;
    let signing_service = config
        .get::<SigningService>()
        .ok_or(SigningStageError::MissingSigningService)?;
    let now = config
        .get::<SystemTime>()
        .copied()
        .unwrap_or_else(SystemTime::now);
    let skew = config.get::<ClockSkew>().copied().unwrap_or_default();
    let request_config = RequestConfig {
        request_ts: skew.apply(now),
        region,
        service: signing_service,
    };
    Ok((operation_config, request_config, creds))
}

impl MapRequest for SigV4SigningStage {
    type Error = SigningStageError;

    fn apply(&self, req: Request) -> Result<Request, Self::Error> {
        req.augment(|req, config| {
            metrics::start_event(config, Field::RequestSigningTime);
            let signed = sign_request(&self.signer, req, config);
            metrics::end_event(config, Field::RequestSigningTime);
            if let Err(err) = &signed {
                tracing::debug!(error = %err, "failed to sign request");
            }
            signed
        })
    }
}

fn sign_request(
    signer: &SigV4Signer,
    req: http::Request<smithy_http::body::SdkBody>,
    config: &PropertyBag,
) -> Result<http::Request<smithy_http::body::SdkBody>, SigningStageError> {
    let (operation_config, request_config, creds) = signing_config(config)?;

    // Only in-memory bodies can be signed; the body is borrowed for hashing and put back after.
    let (parts, body) = req.into_parts();
    let signable_body = body.bytes().ok_or(SigningStageError::InvalidBodyType)?;
    let mut signable_request = http::Request::from_parts(parts, signable_body);

    signer.sign(
        operation_config,
        &request_config,
        creds,
        &mut signable_request,
    )?;
    let (signed_parts, _) = signable_request.into_parts();
    Ok(http::Request::from_parts(signed_parts, body))
}
