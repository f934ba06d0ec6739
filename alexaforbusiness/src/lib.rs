/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Alexa For Business
//!
//! Alexa for Business helps you use Alexa in your organization. Alexa for Business provides
//! you with the tools to manage Alexa devices, enroll your users, and assign skills, at scale.
//! This crate covers rooms, room profiles, skill groups, devices, address books, contacts and
//! resource tags.
//!
//! ```rust,no_run
//! use alexaforbusiness::{Client, Config, Region};
//!
//! # async fn docs() -> Result<(), alexaforbusiness::SdkError<alexaforbusiness::Error>> {
//! let client = Client::from_conf(Config::builder().region(Region::new("us-east-1")).build());
//! let room = client
//!     .get_room()
//!     .room_arn("arn:aws:a4b:us-east-1:123456789012:room/example")
//!     .send()
//!     .await?;
//! println!("{:?}", room.room);
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
    target_prefix: "AlexaForBusiness",
    service_name: "alexaforbusiness",
};
pub(crate) const SIGNING_SERVICE: &str = "a4b";
pub(crate) const ENDPOINT_PREFIX: &str = "a4b";
pub(crate) const DEFAULT_REGION: &str = "us-east-1";
pub(crate) const API_METADATA: ApiMetadata = ApiMetadata::new("alexaforbusiness", PKG_VERSION);
