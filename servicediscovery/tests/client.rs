/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use aws_endpoint::Endpoint;
use aws_hyper::test_connection::TestConnection;
use http::header::AUTHORIZATION;
use servicediscovery::conn::Standard;
use servicediscovery::model::{DnsConfig, DnsRecord, Tag};
use servicediscovery::{Client, Config, Credentials, Error, Region, SdkError};
use smithy_http::body::SdkBody;
use smithy_http::metrics::Field;
use smithy_types::retry::ProvideErrorKind;
use smithy_types::Instant;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type Events = Vec<(http::Request<SdkBody>, http::Response<&'static str>)>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn respond(status: u16, body: &'static str) -> (http::Request<SdkBody>, http::Response<&'static str>) {
    (
        http::Request::new(SdkBody::from("")),
        http::Response::builder()
            .status(status)
            .header("x-amzn-requestid", "4b6a3f56-example")
            .body(body)
            .unwrap(),
    )
}

fn config() -> servicediscovery::ConfigBuilder {
    Config::builder()
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::from_keys("AKIDEXAMPLE", "secret", None))
}

fn client(events: Events) -> (Client, TestConnection<&'static str>) {
    let conn = TestConnection::new(events);
    let client = Client::from_conf_conn(config().build(), Standard::from(conn.clone().into_hyper()));
    (client, conn)
}

#[tokio::test]
async fn create_service_in_a_missing_namespace() {
    init_tracing();
    let (client, conn) = client(vec![respond(
        400,
        r#"{"__type":"NamespaceNotFound","Message":"no such namespace"}"#,
    )]);
    let result = client
        .create_service()
        .name("svc-1")
        .namespace_id("ns-missing")
        .dns_config(DnsConfig {
            routing_policy: Some("MULTIVALUE".to_string()),
            dns_records: Some(vec![DnsRecord {
                record_type: Some("A".to_string()),
                ttl: Some(60),
            }]),
            ..Default::default()
        })
        .send()
        .await;
    match result {
        Err(SdkError::ServiceError {
            err: Error::NamespaceNotFound(err),
            raw,
        }) => {
            assert_eq!(err.message(), Some("no such namespace"));
            assert_eq!(err.request_id(), Some("4b6a3f56-example"));
            assert_eq!(raw.http().status(), 400);
        }
        other => panic!("expected NamespaceNotFound, got {:?}", other),
    }

    let requests = conn.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0].actual;
    assert_eq!(request.method(), http::Method::POST);
    assert_eq!(
        request.uri(),
        "https://servicediscovery.us-east-1.amazonaws.com/"
    );
    assert_eq!(
        request.headers()["x-amz-target"],
        "Route53AutoNaming_v20170314.CreateService"
    );
    assert_eq!(
        request.headers()["content-type"],
        "application/x-amz-json-1.1"
    );
    assert_eq!(
        request.body().bytes(),
        Some(
            &br#"{"Name":"svc-1","NamespaceId":"ns-missing","DnsConfig":{"RoutingPolicy":"MULTIVALUE","DnsRecords":[{"Type":"A","TTL":60}]}}"#[..]
        )
    );
    let authorization = request.headers()[AUTHORIZATION].to_str().unwrap();
    assert!(
        authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"),
        "{}",
        authorization
    );
    assert!(
        authorization.contains("/us-east-1/servicediscovery/aws4_request"),
        "{}",
        authorization
    );
}

#[tokio::test]
async fn every_modeled_code_maps_to_its_variant() {
    let codes = Error::error_table().codes().collect::<Vec<_>>();
    let conn = TestConnection::new(
        codes
            .iter()
            .map(|code| {
                (
                    http::Request::new(SdkBody::from("")),
                    http::Response::builder()
                        .status(400)
                        .body(format!(r#"{{"__type":"{}","Message":"m"}}"#, code))
                        .unwrap(),
                )
            })
            .collect(),
    );
    let client = Client::from_conf_conn(config().build(), Standard::from(conn.into_hyper()));
    for code in codes {
        match client.get_service().id("srv-1").send().await {
            Err(SdkError::ServiceError { err, .. }) => {
                assert!(!err.is_unhandled(), "{} was not modeled", code);
                assert_eq!(err.code(), Some(code));
                assert_eq!(err.message(), Some("m"));
            }
            other => panic!("expected {}, got {:?}", code, other),
        }
    }
}

#[tokio::test]
async fn unknown_codes_are_unhandled() {
    let (client, _conn) = client(vec![respond(
        400,
        r#"{"__type":"com.amazonaws.servicediscovery#Teapot","message":"short and stout"}"#,
    )]);
    match client.list_services().send().await {
        Err(SdkError::ServiceError {
            err: Error::Unhandled(err),
            ..
        }) => {
            assert_eq!(err.code(), Some("Teapot"));
            assert_eq!(err.message(), Some("short and stout"));
        }
        other => panic!("expected an unhandled error, got {:?}", other),
    }
}

#[tokio::test]
async fn throttling_is_reported_without_retrying() {
    let (client, conn) = client(vec![
        respond(400, r#"{"__type":"RequestLimitExceeded"}"#),
        respond(200, "{}"),
    ]);
    match client.list_namespaces().send().await {
        Err(SdkError::ServiceError { err, .. }) => {
            assert_eq!(
                err.error_kind(),
                Some(smithy_types::retry::ErrorKind::ThrottlingError)
            );
        }
        other => panic!("expected RequestLimitExceeded, got {:?}", other),
    }
    assert_eq!(conn.requests().len(), 1);
}

#[tokio::test]
async fn malformed_success_is_unhandled() {
    let (client, _conn) = client(vec![respond(200, r#"{"Namespaces": 12"#)]);
    match client.list_namespaces().send().await {
        Err(SdkError::ServiceError {
            err: Error::Unhandled(err),
            raw,
        }) => {
            assert_eq!(raw.http().status(), 200);
            assert_eq!(err.code(), None);
            assert!(err
                .message()
                .unwrap()
                .starts_with("failed to parse ListNamespaces response"));
        }
        other => panic!("expected an unhandled error, got {:?}", other),
    }
}

#[tokio::test]
async fn transport_failure_is_a_dispatch_failure() {
    let (client, _conn) = client(vec![]);
    match client.list_services().send().await {
        Err(err @ SdkError::DispatchFailure { .. }) => {
            assert_eq!(err.to_string(), "dispatch failure: No more data");
            let metrics = err.metrics().expect("metrics survive a transport failure");
            assert_eq!(metrics.counter(Field::RequestCount), 1);
            assert_eq!(metrics.timings(Field::CredentialsRequestTime).count(), 1);
            assert_eq!(metrics.timings(Field::RequestMarshallTime).count(), 1);
            assert!(!metrics.is_running(Field::ClientExecuteTime));
        }
        other => panic!("expected a dispatch failure, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_required_field_is_never_sent() {
    let (client, conn) = client(vec![respond(200, "{}")]);
    match client
        .register_instance()
        .service_id("srv-1")
        .instance_id("i-1")
        .send()
        .await
    {
        Err(SdkError::ConstructionFailure { err, metrics }) => {
            assert!(err.to_string().starts_with("attributes was missing"), "{}", err);
            let metrics = metrics.expect("metrics are attached to construction failures");
            assert_eq!(metrics.counter(Field::RequestCount), 0);
            assert_eq!(metrics.timings(Field::ClientExecuteTime).count(), 1);
        }
        other => panic!("expected a construction failure, got {:?}", other),
    }
    assert!(conn.requests().is_empty());
}

#[tokio::test]
async fn request_credentials_take_precedence() {
    let (client, conn) = client(vec![respond(200, "{}")]);
    client
        .delete_service()
        .id("srv-1")
        .credentials(Credentials::from_keys(
            "OVERRIDE",
            "override-secret",
            Some("token".to_string()),
        ))
        .send()
        .await
        .expect("success");
    let requests = conn.requests();
    let request = &requests[0].actual;
    let authorization = request.headers()[AUTHORIZATION].to_str().unwrap();
    assert!(
        authorization.starts_with("AWS4-HMAC-SHA256 Credential=OVERRIDE/"),
        "{}",
        authorization
    );
    assert_eq!(request.headers()["x-amz-security-token"], "token");
}

#[tokio::test]
async fn custom_endpoint_keeps_the_signing_scope() {
    let conn = TestConnection::new(vec![respond(200, r#"{"Tags":[{"Key":"team","Value":"core"}]}"#)]);
    let conf = config()
        .region(Region::new("eu-west-1"))
        .endpoint(Endpoint::parse("http://localhost:8000").unwrap())
        .build();
    let client = Client::from_conf_conn(conf, Standard::from(conn.clone().into_hyper()));
    let output = client
        .list_tags_for_resource()
        .resource_arn("arn:aws:servicediscovery:eu-west-1:123456789012:namespace/ns-1")
        .send()
        .await
        .expect("success");
    assert_eq!(
        output.tags,
        Some(vec![Tag {
            key: Some("team".to_string()),
            value: Some("core".to_string()),
        }])
    );
    let requests = conn.requests();
    let request = &requests[0].actual;
    assert_eq!(request.uri(), "http://localhost:8000/");
    let authorization = request.headers()[AUTHORIZATION].to_str().unwrap();
    assert!(
        authorization.contains("/eu-west-1/servicediscovery/aws4_request"),
        "{}",
        authorization
    );
    assert_eq!(
        request.body().bytes(),
        Some(&br#"{"ResourceARN":"arn:aws:servicediscovery:eu-west-1:123456789012:namespace/ns-1"}"#[..])
    );
}

#[tokio::test]
async fn get_operation_output() {
    let (client, _conn) = client(vec![respond(
        200,
        r#"{"Operation":{"Id":"op-1","Type":"CREATE_NAMESPACE","Status":"SUCCESS",
            "CreateDate":1576540098.5,"UpdateDate":1576540100,
            "Targets":{"NAMESPACE":"ns-1"}}}"#,
    )]);
    let operation = client
        .get_operation()
        .operation_id("op-1")
        .send()
        .await
        .expect("success")
        .operation
        .expect("operation is set");
    assert_eq!(operation.operation_type.as_deref(), Some("CREATE_NAMESPACE"));
    assert_eq!(operation.status.as_deref(), Some("SUCCESS"));
    assert_eq!(operation.create_date, Some(Instant::from_f64(1576540098.5)));
    assert_eq!(operation.update_date, Some(Instant::from_epoch_seconds(1576540100)));
    let mut targets = HashMap::new();
    targets.insert("NAMESPACE".to_string(), "ns-1".to_string());
    assert_eq!(operation.targets, Some(targets));
}

#[tokio::test]
async fn every_stage_runs_once() {
    let (client, conn) = client(vec![respond(200, r#"{"OperationId":"op-1"}"#)]);
    let mut attributes = HashMap::new();
    attributes.insert("AWS_INSTANCE_IPV4".to_string(), "10.0.0.1".to_string());
    let success = client
        .register_instance()
        .service_id("srv-1")
        .instance_id("i-1")
        .attributes(attributes)
        .send_raw()
        .await
        .expect("success");
    assert_eq!(success.parsed.operation_id.as_deref(), Some("op-1"));
    assert_eq!(conn.requests().len(), 1);

    let metrics = success.metrics().expect("metrics are recorded");
    assert_eq!(metrics.counter(Field::RequestCount), 1);
    assert_eq!(metrics.counter(Field::RetryCount), 0);
    for field in &[
        Field::ClientExecuteTime,
        Field::RequestMarshallTime,
        Field::CredentialsRequestTime,
        Field::RequestSigningTime,
        Field::HttpRequestTime,
        Field::ResponseProcessingTime,
    ] {
        assert_eq!(metrics.timings(*field).count(), 1, "{:?}", field);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_keep_separate_metrics() {
    init_tracing();
    const CALLS: usize = 18;
    let sent = Arc::new(AtomicUsize::new(0));
    let counter = sent.clone();
    // each call is answered by its MaxResults: a success, a modeled error or a malformed success
    let connector = tower::service_fn(move |req: http::Request<SdkBody>| {
        counter.fetch_add(1, Ordering::SeqCst);
        let body = std::str::from_utf8(req.body().bytes().expect("in-memory body"))
            .expect("utf-8 body")
            .to_string();
        async move {
            let call: usize = body
                .trim_start_matches(r#"{"MaxResults":"#)
                .trim_end_matches('}')
                .parse()
                .expect("MaxResults is the only member");
            tokio::task::yield_now().await;
            let (status, body) = match call % 3 {
                0 => (200, r#"{"Namespaces":[]}"#.to_string()),
                1 => (
                    400,
                    format!(r#"{{"__type":"InvalidInput","Message":"call {}"}}"#, call),
                ),
                _ => (200, r#"{"Namespaces": 12"#.to_string()),
            };
            Ok::<_, Infallible>(
                http::Response::builder()
                    .status(status)
                    .body(hyper::Body::from(body))
                    .unwrap(),
            )
        }
    });
    let client = Client::from_conf_conn(config().build(), Standard::new(connector));
    let calls = (0..CALLS)
        .map(|call| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .list_namespaces()
                    .max_results(call as i32)
                    .send_raw()
                    .await
            })
        })
        .collect::<Vec<_>>();
    for (call, handle) in calls.into_iter().enumerate() {
        let result = handle.await.expect("task completes");
        let metrics = match (call % 3, result) {
            (0, Ok(success)) => {
                assert_eq!(success.parsed.namespaces, Some(vec![]));
                success.metrics()
            }
            (1, Err(err @ SdkError::ServiceError { .. })) => {
                let metrics = err.metrics();
                match err.into_service_error() {
                    Some(Error::InvalidInput(err)) => {
                        assert_eq!(err.message(), Some(format!("call {}", call).as_str()))
                    }
                    other => panic!("call {}: expected InvalidInput, got {:?}", call, other),
                }
                metrics
            }
            (2, Err(err)) => {
                match &err {
                    SdkError::ServiceError {
                        err: Error::Unhandled(unhandled),
                        raw,
                    } => {
                        assert_eq!(raw.http().status(), 200);
                        assert!(unhandled
                            .message()
                            .unwrap()
                            .starts_with("failed to parse ListNamespaces response"));
                    }
                    other => panic!("call {}: expected an unhandled error, got {:?}", call, other),
                }
                err.metrics()
            }
            (_, other) => panic!("call {}: unexpected outcome {:?}", call, other.map(|_| ())),
        };
        let metrics = metrics.expect("metrics are recorded for every outcome");
        assert_eq!(metrics.counter(Field::RequestCount), 1, "call {}", call);
        assert_eq!(metrics.counter(Field::RetryCount), 0, "call {}", call);
        for field in &[
            Field::ClientExecuteTime,
            Field::HttpRequestTime,
            Field::RequestSigningTime,
            Field::ResponseProcessingTime,
        ] {
            assert_eq!(metrics.timings(*field).count(), 1, "call {}: {:?}", call, field);
        }
    }
    assert_eq!(sent.load(Ordering::SeqCst), CALLS);
}
