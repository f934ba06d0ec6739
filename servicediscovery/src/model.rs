/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Shapes shared between operations

use aws_http::json_structure;
use smithy_types::Instant;
use std::collections::HashMap;

json_structure! {
    /// A custom key-value pair associated with a resource
    Tag {
        key: String,
        value: String,
    }
}

json_structure! {
    /// A DNS record that Route 53 creates when an instance is registered
    DnsRecord {
        /// `SRV`, `A`, `AAAA` or `CNAME`
        #[serde(rename = "Type")]
        record_type: String,
        #[serde(rename = "TTL")]
        ttl: i64,
    }
}

json_structure! {
    /// The records Route 53 creates for the instances of a service
    DnsConfig {
        /// Deprecated: the namespace is taken from `CreateService`
        namespace_id: String,
        /// `MULTIVALUE` or `WEIGHTED`
        routing_policy: String,
        dns_records: Vec<DnsRecord>,
    }
}

json_structure! {
    DnsConfigChange {
        dns_records: Vec<DnsRecord>,
    }
}

json_structure! {
    /// A Route 53 health check
    HealthCheckConfig {
        /// `HTTP`, `HTTPS` or `TCP`
        #[serde(rename = "Type")]
        health_check_type: String,
        resource_path: String,
        failure_threshold: i32,
    }
}

json_structure! {
    /// A health check whose status is reported with `UpdateInstanceCustomHealthStatus`
    HealthCheckCustomConfig {
        failure_threshold: i32,
    }
}

json_structure! {
    Service {
        id: String,
        arn: String,
        name: String,
        namespace_id: String,
        description: String,
        instance_count: i32,
        dns_config: DnsConfig,
        health_check_config: HealthCheckConfig,
        health_check_custom_config: HealthCheckCustomConfig,
        create_date: Instant,
        creator_request_id: String,
    }
}

json_structure! {
    ServiceSummary {
        id: String,
        arn: String,
        name: String,
        description: String,
        instance_count: i32,
        dns_config: DnsConfig,
        health_check_config: HealthCheckConfig,
        health_check_custom_config: HealthCheckCustomConfig,
        create_date: Instant,
    }
}

json_structure! {
    /// New settings for a service, see `UpdateService`
    ServiceChange {
        description: String,
        dns_config: DnsConfigChange,
        health_check_config: HealthCheckConfig,
    }
}

json_structure! {
    ServiceFilter {
        /// Only `NAMESPACE_ID` is supported
        name: String,
        values: Vec<String>,
        condition: String,
    }
}

json_structure! {
    DnsProperties {
        hosted_zone_id: String,
    }
}

json_structure! {
    HttpProperties {
        http_name: String,
    }
}

json_structure! {
    NamespaceProperties {
        dns_properties: DnsProperties,
        http_properties: HttpProperties,
    }
}

json_structure! {
    Namespace {
        id: String,
        arn: String,
        name: String,
        /// `DNS_PUBLIC`, `DNS_PRIVATE` or `HTTP`
        #[serde(rename = "Type")]
        namespace_type: String,
        description: String,
        service_count: i32,
        properties: NamespaceProperties,
        create_date: Instant,
        creator_request_id: String,
    }
}

json_structure! {
    NamespaceSummary {
        id: String,
        arn: String,
        name: String,
        #[serde(rename = "Type")]
        namespace_type: String,
        description: String,
        service_count: i32,
        properties: NamespaceProperties,
        create_date: Instant,
    }
}

json_structure! {
    NamespaceFilter {
        /// Only `TYPE` is supported
        name: String,
        values: Vec<String>,
        condition: String,
    }
}

json_structure! {
    /// An asynchronous operation started by a create, update or delete request
    Operation {
        id: String,
        #[serde(rename = "Type")]
        operation_type: String,
        /// `SUBMITTED`, `PENDING`, `SUCCESS` or `FAIL`
        status: String,
        error_message: String,
        error_code: String,
        create_date: Instant,
        update_date: Instant,
        /// Keys are `NAMESPACE`, `SERVICE` and `INSTANCE`
        targets: HashMap<String, String>,
    }
}

json_structure! {
    OperationSummary {
        id: String,
        status: String,
    }
}

json_structure! {
    OperationFilter {
        /// `NAMESPACE_ID`, `SERVICE_ID`, `STATUS`, `TYPE` or `UPDATE_DATE`
        name: String,
        values: Vec<String>,
        condition: String,
    }
}

json_structure! {
    Instance {
        id: String,
        creator_request_id: String,
        attributes: HashMap<String, String>,
    }
}

json_structure! {
    InstanceSummary {
        id: String,
        attributes: HashMap<String, String>,
    }
}

json_structure! {
    /// An instance returned by `DiscoverInstances`
    HttpInstanceSummary {
        instance_id: String,
        namespace_name: String,
        service_name: String,
        /// `HEALTHY`, `UNHEALTHY` or `UNKNOWN`
        health_status: String,
        attributes: HashMap<String, String>,
    }
}
