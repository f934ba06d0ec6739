/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Modeled errors of AWS Cloud Map
//!
//! Every operation shares one [`Error`] enum. Response codes are matched against the variants in
//! the order they are declared here; codes that are not modeled become [`Error::Unhandled`].

aws_http::json_errors! {
    /// An error returned by AWS Cloud Map
    Error;
    /// The health check for the instance that is specified by `ServiceId` and `InstanceId` is not
    /// a custom health check.
    CustomHealthNotFound,
    /// The operation is already in progress.
    DuplicateRequest { duplicate_operation_id },
    /// No instance exists with the specified ID, or the instance was recently registered.
    InstanceNotFound,
    /// One or more specified values aren't valid.
    InvalidInput,
    /// The namespace that you're trying to create already exists.
    NamespaceAlreadyExists { creator_request_id, namespace_id },
    /// No namespace exists with the specified ID.
    NamespaceNotFound,
    /// No operation exists with the specified ID.
    OperationNotFound,
    /// The operation can't be completed because you've reached the quota for the number of
    /// requests.
    RequestLimitExceeded [throttling],
    /// The specified resource can't be deleted because it contains other resources.
    ResourceInUse,
    /// The resource can't be created because you've reached the quota on the number of resources.
    ResourceLimitExceeded,
    /// The operation can't be completed because the resource was not found.
    ResourceNotFoundException,
    /// The service can't be created because a service with the same name already exists.
    ServiceAlreadyExists { creator_request_id, service_id },
    /// No service exists with the specified ID.
    ServiceNotFound,
    /// The list of tags on the resource is over the quota.
    TooManyTagsException { resource_name },
}
