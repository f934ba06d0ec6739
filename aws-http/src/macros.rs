/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Declarative generation of JSON shapes, operations and error types
//!
//! Crates invoking these macros must depend on `serde` (with the `derive` feature).

/// Declares a structure of the JSON protocol
///
/// Members are serialized in `PascalCase`, every member is optional and unset members are
/// omitted from the serialized body. Members whose wire name is not the `PascalCase` form of
/// their Rust name take a `#[serde(rename = "...")]` attribute.
#[macro_export]
macro_rules! json_structure {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(rename_all = "PascalCase")]
        pub struct $name {
            $(
                $(#[$field_meta])*
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }
    };
}

/// Declares the operations of a JSON service
///
/// For each operation this generates the input and output structures, required-member
/// validation, a marker type implementing [`JsonOperation`](crate::json::JsonOperation), one
/// setter per input member on the fluent builder and an entry point on the client.
///
/// The client type must have a `handle` field and the fluent builder type must provide
/// `fn new(handle) -> Self` and an `inner` field holding the input.
///
/// ```ignore
/// aws_http::json_operations! {
///     client = Client, fluent = Fluent;
///
///     /// Gets room details by room ARN.
///     GetRoom, get_room {
///         input GetRoomInput { room_arn: String }
///         required []
///         output GetRoomOutput { room: Room }
///     }
/// }
/// ```
#[macro_export]
macro_rules! json_operations {
    (
        client = $client:ident, fluent = $fluent:ident;
        $(
            $(#[$meta:meta])*
            $op:ident, $method:ident {
                input $input:ident {
                    $( $(#[$in_meta:meta])* $in_field:ident : $in_ty:ty ),* $(,)?
                }
                required [ $($required:ident),* $(,)? ]
                output $output:ident {
                    $( $(#[$out_meta:meta])* $out_field:ident : $out_ty:ty ),* $(,)?
                }
            }
        )*
    ) => {
        $(
            $crate::json_structure! {
                #[doc = concat!("Input of [`", stringify!($op), "`]")]
                $input { $( $(#[$in_meta])* $in_field : $in_ty ),* }
            }

            impl $input {
                /// Fails with `MissingField` naming the first required member that is unset
                pub fn validate(
                    &self,
                ) -> ::std::result::Result<(), $crate::__private::smithy_http::operation::BuildError> {
                    $(
                        if self.$required.is_none() {
                            return Err(
                                $crate::__private::smithy_http::operation::BuildError::MissingField {
                                    field: stringify!($required),
                                    details: concat!(
                                        "`", stringify!($required), "` is required by ", stringify!($op)
                                    ),
                                },
                            );
                        }
                    )*
                    Ok(())
                }
            }

            $crate::json_structure! {
                #[doc = concat!("Output of [`", stringify!($op), "`]")]
                $output { $( $(#[$out_meta])* $out_field : $out_ty ),* }
            }

            $(#[$meta])*
            #[derive(Clone, Copy, Debug, Default)]
            pub struct $op;

            impl $crate::json::JsonOperation for $op {
                const NAME: &'static str = stringify!($op);
                type Input = $input;
                type Output = $output;

                fn validate(
                    input: &$input,
                ) -> ::std::result::Result<(), $crate::__private::smithy_http::operation::BuildError> {
                    input.validate()
                }
            }

            impl $fluent<$op> {
                $(
                    #[doc = concat!("Sets `", stringify!($in_field), "`")]
                    pub fn $in_field(mut self, input: impl Into<$in_ty>) -> Self {
                        self.inner.$in_field = Some(input.into());
                        self
                    }
                )*
            }

            impl $client {
                $(#[$meta])*
                pub fn $method(&self) -> $fluent<$op> {
                    $fluent::new(self.handle.clone())
                }
            }
        )*
    };
}

/// Declares the modeled errors of a JSON service and the enum that unites them
///
/// Each error is a structure carrying the message and request id of the response, plus any
/// extra members listed in braces (read from the error body). An error tagged `[throttling]`,
/// `[server]` or `[client]` reports that [`ErrorKind`](smithy_types::retry::ErrorKind).
///
/// The enum gets an `Unhandled` variant for codes that are not modeled and an
/// `error_table()` constructor registering the errors in declaration order.
#[macro_export]
macro_rules! json_errors {
    (@kind) => { None };
    (@kind throttling) => {
        Some($crate::__private::smithy_types::retry::ErrorKind::ThrottlingError)
    };
    (@kind server) => {
        Some($crate::__private::smithy_types::retry::ErrorKind::ServerError)
    };
    (@kind client) => {
        Some($crate::__private::smithy_types::retry::ErrorKind::ClientError)
    };
    (
        $(#[$enum_meta:meta])*
        $enum:ident;
        $(
            $(#[$meta:meta])*
            $name:ident $({ $($field:ident),* $(,)? })? $([$kind:ident])?
        ),* $(,)?
    ) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Debug, Default, PartialEq, ::serde::Deserialize)]
            #[serde(rename_all = "PascalCase")]
            pub struct $name {
                #[serde(skip)]
                message: Option<String>,
                #[serde(skip)]
                request_id: Option<String>,
                $($(
                    #[serde(default)]
                    $field: Option<String>,
                )*)?
            }

            impl $name {
                /// The wire code of this error
                pub const CODE: &'static str = stringify!($name);

                pub fn message(&self) -> Option<&str> {
                    self.message.as_deref()
                }

                pub fn request_id(&self) -> Option<&str> {
                    self.request_id.as_deref()
                }

                $($(
                    pub fn $field(&self) -> Option<&str> {
                        self.$field.as_deref()
                    }
                )*)?

                fn from_response(
                    generic: $crate::__private::smithy_types::Error,
                    body: &[u8],
                ) -> Self {
                    let mut err: $name =
                        $crate::__private::serde_json::from_slice(body).unwrap_or_default();
                    err.message = generic.message().map(|message| message.to_string());
                    err.request_id = generic.request_id().map(|request_id| request_id.to_string());
                    err
                }
            }

            impl ::std::fmt::Display for $name {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    write!(f, "{}", Self::CODE)?;
                    if let Some(message) = &self.message {
                        write!(f, ": {}", message)?;
                    }
                    Ok(())
                }
            }

            impl ::std::error::Error for $name {}
        )*

        $(#[$enum_meta])*
        #[derive(Debug, PartialEq)]
        #[non_exhaustive]
        pub enum $enum {
            $( $name($name), )*
            /// An error whose code is not modeled, or a response that could not be parsed
            Unhandled($crate::__private::smithy_types::Error),
        }

        impl $enum {
            /// Codes in declaration order, then the fallback to `Unhandled`
            pub fn error_table() -> $crate::__private::smithy_http::error_table::ErrorTable<$enum> {
                $crate::__private::smithy_http::error_table::ErrorTable::builder($enum::Unhandled)
                    $(
                        .register(stringify!($name), |generic, body| {
                            $enum::$name($name::from_response(generic, body))
                        })
                    )*
                    .build()
            }

            pub fn message(&self) -> Option<&str> {
                match self {
                    $( $enum::$name(err) => err.message(), )*
                    $enum::Unhandled(err) => err.message(),
                }
            }

            pub fn request_id(&self) -> Option<&str> {
                match self {
                    $( $enum::$name(err) => err.request_id(), )*
                    $enum::Unhandled(err) => err.request_id(),
                }
            }

            pub fn is_unhandled(&self) -> bool {
                matches!(self, $enum::Unhandled(_))
            }
        }

        impl $crate::__private::smithy_types::retry::ProvideErrorKind for $enum {
            fn error_kind(&self) -> Option<$crate::__private::smithy_types::retry::ErrorKind> {
                match self {
                    $( $enum::$name(_) => $crate::json_errors!(@kind $($kind)?), )*
                    $enum::Unhandled(_) => None,
                }
            }

            fn code(&self) -> Option<&str> {
                match self {
                    $( $enum::$name(_) => Some($name::CODE), )*
                    $enum::Unhandled(err) => err.code(),
                }
            }
        }

        impl ::std::fmt::Display for $enum {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $( $enum::$name(err) => ::std::fmt::Display::fmt(err, f), )*
                    $enum::Unhandled(err) => ::std::fmt::Display::fmt(err, f),
                }
            }
        }

        impl ::std::error::Error for $enum {
            fn source(&self) -> Option<&(dyn ::std::error::Error + 'static)> {
                match self {
                    $( $enum::$name(err) => Some(err), )*
                    $enum::Unhandled(_) => None,
                }
            }
        }
    };
}
