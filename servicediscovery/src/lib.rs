/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! AWS Cloud Map
//!
//! AWS Cloud Map lets you configure public DNS, private DNS, or HTTP namespaces that your
//! microservice applications run in. When an instance becomes available, you can call the
//! Cloud Map API to register the instance with Cloud Map. For public or private DNS
//! namespaces, Cloud Map automatically creates DNS records and an optional health check.
//! Clients that submit public or private DNS queries, or HTTP requests, for the service
//! receive an answer that contains up to eight healthy records.
//!
//! ```rust,no_run
//! use servicediscovery::{Client, Config, Region};
//!
//! # async fn docs() -> Result<(), servicediscovery::SdkError<servicediscovery::Error>> {
//! let conf = Config::builder().region(Region::new("us-west-2")).build();
//! let client = Client::from_conf(conf);
//! let services = client.list_services().send().await?;
//! for service in services.services.unwrap_or_default() {
//!     println!("{:?}", service.name);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
pub mod model;
pub mod operation;

pub use crate::client::{Client, FluentBuilder};
pub use crate::config::{Builder as ConfigBuilder, Config};
pub use crate::error::*;
pub use aws_auth::Credentials;
pub use aws_hyper::{conn, RetryConfig, SdkError, SdkSuccess};
pub use aws_types::region::Region;

use aws_http::json::JsonService;
use aws_http::user_agent::ApiMetadata;

pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) const SERVICE: JsonService = JsonService {
    target_prefix: "Route53AutoNaming_v20170314",
    service_name: "servicediscovery",
};
pub(crate) const SIGNING_SERVICE: &str = "servicediscovery";
pub(crate) const ENDPOINT_PREFIX: &str = "servicediscovery";
pub(crate) const DEFAULT_REGION: &str = "us-east-1";
pub(crate) const API_METADATA: ApiMetadata = ApiMetadata::new("servicediscovery", PKG_VERSION);
