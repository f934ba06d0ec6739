/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::test_connection::TestConnection;
use crate::BoxError;
use hyper::client::{HttpConnector, ResponseFuture};
use hyper_proxy::{Intercept, Proxy, ProxyConnector};
use hyper_tls::HttpsConnector;
use smithy_http::body::SdkBody;
use std::fmt;
use std::future::{self, Future, Ready};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::Sleep;
use tower::Service;

/// Socket level settings of the standard HTTPS transport
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct HttpSettings {
    /// Maximum time to establish a connection
    pub connect_timeout: Option<Duration>,
    /// Maximum time from sending the request until response headers are received
    pub read_timeout: Option<Duration>,
    /// Proxy every request through this URI. `https` destinations are tunneled with `CONNECT`.
    pub proxy: Option<http::Uri>,
}

impl HttpSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn with_proxy(mut self, proxy: http::Uri) -> Self {
        self.proxy = Some(proxy);
        self
    }
}

type HttpsClient = hyper::Client<ProxyConnector<HttpsConnector<HttpConnector>>, SdkBody>;

/// A good base connection type for most use cases
///
/// This supports three options:
/// 1. HTTPS
/// 2. A `TestConnection`
/// 3. Any implementation of the `HttpService` trait
///
/// The HTTPS connection goes through [`HttpSettings::proxy`] when one is set.
pub enum Standard {
    Https {
        client: HttpsClient,
        read_timeout: Option<Duration>,
    },
    Test(TestConnection<hyper::Body>),
    Dyn(Box<dyn HttpService>),
    /// The HTTPS connector could not be built; every call fails with this reason
    Unavailable(String),
}

impl Standard {
    /// An HTTPS connection with default settings
    pub fn https() -> Self {
        Self::https_with_settings(HttpSettings::default())
    }

    /// An HTTPS connection using `settings`
    ///
    /// If a proxy is configured but its TLS connector cannot be initialized, the failure is
    /// reported as a dispatch failure by every call made through the connection.
    pub fn https_with_settings(settings: HttpSettings) -> Self {
        match connector(&settings) {
            Ok(connector) => Standard::Https {
                client: hyper::Client::builder().build::<_, SdkBody>(connector),
                read_timeout: settings.read_timeout,
            },
            Err(err) => {
                tracing::warn!(error = %err, "failed to build the proxy connector");
                Standard::Unavailable(format!("failed to build the proxy connector: {}", err))
            }
        }
    }

    /// Wrap any tower service that sends `http::Request<SdkBody>`
    pub fn new(connector: impl HttpService + 'static) -> Self {
        Standard::Dyn(Box::new(connector))
    }
}

fn connector(
    settings: &HttpSettings,
) -> std::io::Result<ProxyConnector<HttpsConnector<HttpConnector>>> {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_connect_timeout(settings.connect_timeout);
    let https = HttpsConnector::new_with_connector(http);
    match &settings.proxy {
        Some(uri) => ProxyConnector::from_proxy(https, Proxy::new(Intercept::All, uri.clone())),
        // without proxies the connector hands every destination to the inner connector
        None => Ok(ProxyConnector::unsecured(https)),
    }
}

impl From<TestConnection<hyper::Body>> for Standard {
    fn from(conn: TestConnection<hyper::Body>) -> Self {
        Standard::Test(conn)
    }
}

impl Clone for Standard {
    fn clone(&self) -> Self {
        match self {
            Standard::Https {
                client,
                read_timeout,
            } => Standard::Https {
                client: client.clone(),
                read_timeout: *read_timeout,
            },
            Standard::Test(test_conn) => Standard::Test(test_conn.clone()),
            Standard::Dyn(box_conn) => Standard::Dyn(box_conn.clone_box()),
            Standard::Unavailable(reason) => Standard::Unavailable(reason.clone()),
        }
    }
}

impl fmt::Debug for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Standard::Https { read_timeout, .. } => f
                .debug_struct("Https")
                .field("read_timeout", read_timeout)
                .finish(),
            Standard::Test(_) => f.write_str("Test"),
            Standard::Dyn(_) => f.write_str("Dyn"),
            Standard::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

type BoxFuture = Pin<Box<dyn Future<Output = Result<http::Response<hyper::Body>, BoxError>> + Send>>;

/// An object-safe HTTP connector
///
/// Implemented for every cloneable tower service sending `http::Request<SdkBody>`.
pub trait HttpService: Send + Sync {
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), BoxError>>;
    fn call(&mut self, req: http::Request<SdkBody>) -> BoxFuture;
    fn clone_box(&self) -> Box<dyn HttpService>;
}

impl<S> HttpService for S
where
    S: Service<http::Request<SdkBody>, Response = http::Response<hyper::Body>>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send + 'static,
{
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), BoxError>> {
        Service::poll_ready(self, cx).map_err(|err| err.into())
    }

    fn call(&mut self, req: http::Request<SdkBody>) -> BoxFuture {
        let fut = Service::call(self, req);
        Box::pin(async move { fut.await.map_err(|err| err.into()) })
    }

    fn clone_box(&self) -> Box<dyn HttpService> {
        Box::new(self.clone())
    }
}

impl tower::Service<http::Request<SdkBody>> for Standard {
    type Response = http::Response<hyper::Body>;
    type Error = BoxError;
    type Future = StandardFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        match self {
            Standard::Https { client, .. } => {
                Service::poll_ready(client, cx).map_err(|err| err.into())
            }
            Standard::Dyn(conn) => conn.poll_ready(cx),
            Standard::Test(_) | Standard::Unavailable(_) => Poll::Ready(Ok(())),
        }
    }

    fn call(&mut self, req: http::Request<SdkBody>) -> Self::Future {
        match self {
            Standard::Https {
                client,
                read_timeout,
            } => StandardFuture::Https {
                inner: Service::call(client, req),
                timeout: read_timeout.map(tokio::time::sleep),
            },
            Standard::Dyn(conn) => StandardFuture::Dyn(conn.call(req)),
            Standard::Test(conn) => StandardFuture::Immediate(Service::call(conn, req)),
            Standard::Unavailable(reason) => {
                StandardFuture::Immediate(future::ready(Err(reason.clone().into())))
            }
        }
    }
}

#[derive(Debug)]
pub struct ReadTimeout;

impl fmt::Display for ReadTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no response was received before the read timeout")
    }
}

impl std::error::Error for ReadTimeout {}

#[pin_project::pin_project(project = FutProj)]
pub enum StandardFuture {
    Https {
        #[pin]
        inner: ResponseFuture,
        #[pin]
        timeout: Option<Sleep>,
    },
    Immediate(#[pin] Ready<Result<http::Response<hyper::Body>, BoxError>>),
    Dyn(#[pin] BoxFuture),
}

impl Future for StandardFuture {
    type Output = Result<http::Response<hyper::Body>, BoxError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project() {
            FutProj::Immediate(ready_fut) => ready_fut.poll(cx),
            FutProj::Https { inner, timeout } => {
                if let Poll::Ready(result) = inner.poll(cx) {
                    return Poll::Ready(result.map_err(|err| err.into()));
                }
                if let Some(sleep) = timeout.as_pin_mut() {
                    if sleep.poll(cx).is_ready() {
                        return Poll::Ready(Err(Box::new(ReadTimeout)));
                    }
                }
                Poll::Pending
            }
            FutProj::Dyn(dyn_fut) => dyn_fut.poll(cx),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::conn::{HttpSettings, Standard};
    use crate::test_connection::TestConnection;
    use smithy_http::body::SdkBody;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tower::{Service, ServiceExt};

    #[tokio::test]
    async fn dyn_connector_is_called() {
        let conn = tower::service_fn(|_req: http::Request<SdkBody>| async {
            Ok::<_, std::convert::Infallible>(
                http::Response::builder()
                    .status(204)
                    .body(hyper::Body::empty())
                    .unwrap(),
            )
        });
        let mut standard = Standard::new(conn);
        let resp = standard
            .ready()
            .await
            .unwrap()
            .call(http::Request::new(SdkBody::from("")))
            .await
            .expect("connector succeeds");
        assert_eq!(resp.status(), 204);
        assert!(matches!(standard.clone(), Standard::Dyn(_)));
    }

    #[tokio::test]
    async fn test_connection_variant() {
        let conn = TestConnection::new(vec![(
            http::Request::new(SdkBody::from("")),
            http::Response::new(hyper::Body::from("ok")),
        )]);
        let mut standard = Standard::from(conn.clone());
        let resp = standard
            .call(http::Request::new(SdkBody::from("")))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(conn.requests().len(), 1);
    }

    #[tokio::test]
    async fn https_settings_are_kept() {
        let settings = HttpSettings::new()
            .with_connect_timeout(Duration::from_secs(1))
            .with_read_timeout(Duration::from_secs(2));
        match Standard::https_with_settings(settings) {
            Standard::Https { read_timeout, .. } => {
                assert_eq!(read_timeout, Some(Duration::from_secs(2)))
            }
            other => panic!("unexpected connector: {:?}", other),
        }
    }

    #[tokio::test]
    async fn requests_are_sent_through_the_proxy() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let proxy: http::Uri = format!("http://{}", listener.local_addr().unwrap())
            .parse()
            .unwrap();
        let proxy_server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = socket.read(&mut buf).await.unwrap();
                if read == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..read]);
            }
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\n\r\nok")
                .await
                .unwrap();
            String::from_utf8(head).unwrap()
        });

        let settings = HttpSettings::new().with_proxy(proxy.clone());
        assert_eq!(settings.proxy, Some(proxy));
        let mut standard = Standard::https_with_settings(settings);
        let resp = standard
            .ready()
            .await
            .unwrap()
            .call(
                http::Request::builder()
                    .uri("http://servicediscovery.us-east-1.amazonaws.com/")
                    .body(SdkBody::from(""))
                    .unwrap(),
            )
            .await
            .expect("the proxy answers");
        assert_eq!(resp.status(), 200);

        let head = proxy_server.await.unwrap();
        assert!(
            head.starts_with("GET http://servicediscovery.us-east-1.amazonaws.com/ HTTP/1.1"),
            "{}",
            head
        );
    }

    #[tokio::test]
    async fn unavailable_connector_fails_every_call() {
        let mut standard = Standard::Unavailable("no tls backend".to_string());
        for _ in 0..2 {
            let err = standard
                .ready()
                .await
                .unwrap()
                .call(http::Request::new(SdkBody::from("")))
                .await
                .expect_err("nothing can be sent");
            assert_eq!(err.to_string(), "no tls backend");
        }
    }
}
