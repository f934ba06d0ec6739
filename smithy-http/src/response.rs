/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::operation;
use bytes::Bytes;
use http::Response;

/// `ParseHttpResponse` is a generic trait for parsing structured data from HTTP responses.
///
/// The split between `parse_unloaded` and `parse_loaded` keeps the parsing code pure and sync
/// whenever possible and delegates the process of actually reading the HTTP response to the
/// caller when the required behavior is simply "read to the end."
pub trait ParseHttpResponse {
    /// Output type of the HttpResponse.
    ///
    /// For request/response style operations, this is typically something like:
    /// `Result<GetRoomOutput, alexaforbusiness::Error>`
    type Output;

    /// Parse an HTTP request without reading the body. If the body must be provided to proceed,
    /// return `None`
    ///
    /// This exists to serve APIs whose body is handed to the caller as a stream. Every operation
    /// of the JSON protocol reads the body first and returns `None` here.
    fn parse_unloaded(&self, response: &mut operation::Response) -> Option<Self::Output>;

    /// Parse an HTTP request from a fully loaded body. This is for standard request/response style
    /// APIs like AwsJSON as well as for the error path of most streaming APIs
    fn parse_loaded(&self, response: &Response<Bytes>) -> Self::Output;
}

/// Convenience Trait for non-streaming APIs
///
/// `ParseStrictResponse` enables operations that _never_ need to stream the body incrementally to
/// have cleaner implementations. There is a blanket implementation
pub trait ParseStrictResponse {
    type Output;
    fn parse(&self, response: &Response<Bytes>) -> Self::Output;
}

impl<T: ParseStrictResponse> ParseHttpResponse for T {
    type Output = T::Output;

    fn parse_unloaded(&self, _response: &mut operation::Response) -> Option<Self::Output> {
        None
    }

    fn parse_loaded(&self, response: &Response<Bytes>) -> Self::Output {
        self.parse(response)
    }
}

#[cfg(test)]
mod test {
    use crate::body::SdkBody;
    use crate::operation;
    use crate::response::{ParseHttpResponse, ParseStrictResponse};
    use bytes::Bytes;
    use std::mem;

    #[test]
    fn supports_streaming_body() {
        pub struct StreamingOutput {
            pub body: SdkBody,
        }

        struct StreamingParser;

        impl ParseHttpResponse for StreamingParser {
            type Output = StreamingOutput;

            fn parse_unloaded(&self, response: &mut operation::Response) -> Option<Self::Output> {
                // For responses that pass on the body, use mem::take to leave behind an empty body
                let body = mem::replace(response.http_mut().body_mut(), SdkBody::taken());
                Some(StreamingOutput { body })
            }

            fn parse_loaded(&self, _response: &http::Response<Bytes>) -> Self::Output {
                unimplemented!()
            }
        }

        let mut response = operation::Response::new(http::Response::new(SdkBody::from("hello")));
        let parsed = StreamingParser
            .parse_unloaded(&mut response)
            .expect("streaming parsers parse unloaded bodies");
        assert_eq!(parsed.body.bytes(), Some("hello".as_bytes()));
    }

    #[test]
    fn strict_parsers_never_parse_unloaded() {
        struct Status;
        impl ParseStrictResponse for Status {
            type Output = u16;
            fn parse(&self, response: &http::Response<Bytes>) -> Self::Output {
                response.status().as_u16()
            }
        }
        let mut response = operation::Response::new(http::Response::new(SdkBody::empty()));
        assert!(Status.parse_unloaded(&mut response).is_none());
        let loaded = http::Response::builder()
            .status(404)
            .body(Bytes::new())
            .unwrap();
        assert_eq!(Status.parse_loaded(&loaded), 404);
    }
}
