/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Modeled errors of Alexa For Business
//!
//! Response codes are matched against the variants in declaration order. Anything else is
//! [`Error::Unhandled`].

aws_http::json_errors! {
    /// An error returned by Alexa For Business
    Error;
    /// The resource being created already exists.
    AlreadyExistsException,
    /// There is a concurrent modification of resources.
    ConcurrentModificationException [throttling],
    /// The request failed because this device is no longer registered and therefore no longer
    /// managed by this account.
    DeviceNotRegisteredException,
    /// The Certificate Authority can't issue or revoke a certificate.
    InvalidCertificateAuthorityException,
    /// The device is in an invalid state.
    InvalidDeviceException,
    /// A password in SecretsManager is in an invalid state.
    InvalidSecretsManagerResourceException,
    /// The service linked role is locked for deletion.
    InvalidServiceLinkedRoleStateException,
    /// The attempt to update a user is invalid due to the user's current status.
    InvalidUserStatusException,
    /// You are performing an action that would put you beyond your account's limits.
    LimitExceededException [throttling],
    /// The name sent in the request is already in use.
    NameInUseException,
    /// The resource is not found.
    NotFoundException,
    /// Another resource is associated with the resource in the request.
    ResourceAssociatedException,
    /// The resource in the request is already in use.
    ResourceInUseException { client_request_token },
    /// The skill must be linked to a third-party account.
    SkillNotLinkedException,
    /// The caller has no permissions to operate on the resource involved in the API call.
    UnauthorizedException,
}
