/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Operations of AWS Cloud Map, their inputs and outputs

use crate::client::{Client, FluentBuilder};
use crate::model::{
    DnsConfig, HealthCheckConfig, HealthCheckCustomConfig, HttpInstanceSummary, Instance,
    InstanceSummary, Namespace, NamespaceFilter, NamespaceSummary, Operation, OperationFilter,
    OperationSummary, Service, ServiceChange, ServiceFilter, ServiceSummary, Tag,
};
use std::collections::HashMap;

aws_http::json_operations! {
    client = Client, fluent = FluentBuilder;

    /// Creates an HTTP namespace. Service instances registered in it are discoverable with
    /// `DiscoverInstances` but not with DNS queries.
    CreateHttpNamespace, create_http_namespace {
        input CreateHttpNamespaceInput {
            name: String,
            creator_request_id: String,
            description: String,
            tags: Vec<Tag>,
        }
        required [name]
        output CreateHttpNamespaceOutput { operation_id: String }
    }

    /// Creates a private namespace based on DNS, visible only inside the specified Amazon VPC.
    CreatePrivateDnsNamespace, create_private_dns_namespace {
        input CreatePrivateDnsNamespaceInput {
            name: String,
            creator_request_id: String,
            description: String,
            vpc: String,
            tags: Vec<Tag>,
        }
        required [name, vpc]
        output CreatePrivateDnsNamespaceOutput { operation_id: String }
    }

    /// Creates a public namespace based on DNS, visible on the internet.
    CreatePublicDnsNamespace, create_public_dns_namespace {
        input CreatePublicDnsNamespaceInput {
            name: String,
            creator_request_id: String,
            description: String,
            tags: Vec<Tag>,
        }
        required [name]
        output CreatePublicDnsNamespaceOutput { operation_id: String }
    }

    /// Creates a service: the DNS records and optional health check that Cloud Map maintains
    /// for the instances registered with it.
    CreateService, create_service {
        input CreateServiceInput {
            name: String,
            namespace_id: String,
            creator_request_id: String,
            description: String,
            dns_config: DnsConfig,
            health_check_config: HealthCheckConfig,
            health_check_custom_config: HealthCheckCustomConfig,
            tags: Vec<Tag>,
        }
        required [name]
        output CreateServiceOutput { service: Service }
    }

    /// Deletes a namespace. A namespace that still contains services can't be deleted.
    DeleteNamespace, delete_namespace {
        input DeleteNamespaceInput { id: String }
        required [id]
        output DeleteNamespaceOutput { operation_id: String }
    }

    /// Deletes a service. A service that still has registered instances can't be deleted.
    DeleteService, delete_service {
        input DeleteServiceInput { id: String }
        required [id]
        output DeleteServiceOutput {}
    }

    /// Deletes the DNS records and health check that were created for an instance.
    DeregisterInstance, deregister_instance {
        input DeregisterInstanceInput {
            service_id: String,
            instance_id: String,
        }
        required [service_id, instance_id]
        output DeregisterInstanceOutput { operation_id: String }
    }

    /// Discovers registered instances by namespace and service name.
    DiscoverInstances, discover_instances {
        input DiscoverInstancesInput {
            namespace_name: String,
            service_name: String,
            max_results: i32,
            query_parameters: HashMap<String, String>,
            /// `HEALTHY`, `UNHEALTHY`, `ALL` or `HEALTHY_OR_ELSE_ALL`
            health_status: String,
        }
        required [namespace_name, service_name]
        output DiscoverInstancesOutput { instances: Vec<HttpInstanceSummary> }
    }

    GetInstance, get_instance {
        input GetInstanceInput {
            service_id: String,
            instance_id: String,
        }
        required [service_id, instance_id]
        output GetInstanceOutput { instance: Instance }
    }

    /// Gets the current health status (`Healthy`, `Unhealthy` or `Unknown`) of instances.
    GetInstancesHealthStatus, get_instances_health_status {
        input GetInstancesHealthStatusInput {
            service_id: String,
            instances: Vec<String>,
            max_results: i32,
            next_token: String,
        }
        required [service_id]
        output GetInstancesHealthStatusOutput {
            status: HashMap<String, String>,
            next_token: String,
        }
    }

    GetNamespace, get_namespace {
        input GetNamespaceInput { id: String }
        required [id]
        output GetNamespaceOutput { namespace: Namespace }
    }

    /// Gets information about an operation started by a create, update or delete request.
    GetOperation, get_operation {
        input GetOperationInput { operation_id: String }
        required [operation_id]
        output GetOperationOutput { operation: Operation }
    }

    GetService, get_service {
        input GetServiceInput { id: String }
        required [id]
        output GetServiceOutput { service: Service }
    }

    /// Lists summary information about the instances registered with a service.
    ListInstances, list_instances {
        input ListInstancesInput {
            service_id: String,
            next_token: String,
            max_results: i32,
        }
        required [service_id]
        output ListInstancesOutput {
            instances: Vec<InstanceSummary>,
            next_token: String,
        }
    }

    ListNamespaces, list_namespaces {
        input ListNamespacesInput {
            next_token: String,
            max_results: i32,
            filters: Vec<NamespaceFilter>,
        }
        required []
        output ListNamespacesOutput {
            namespaces: Vec<NamespaceSummary>,
            next_token: String,
        }
    }

    ListOperations, list_operations {
        input ListOperationsInput {
            next_token: String,
            max_results: i32,
            filters: Vec<OperationFilter>,
        }
        required []
        output ListOperationsOutput {
            operations: Vec<OperationSummary>,
            next_token: String,
        }
    }

    ListServices, list_services {
        input ListServicesInput {
            next_token: String,
            max_results: i32,
            filters: Vec<ServiceFilter>,
        }
        required []
        output ListServicesOutput {
            services: Vec<ServiceSummary>,
            next_token: String,
        }
    }

    ListTagsForResource, list_tags_for_resource {
        input ListTagsForResourceInput {
            #[serde(rename = "ResourceARN")]
            resource_arn: String,
        }
        required [resource_arn]
        output ListTagsForResourceOutput { tags: Vec<Tag> }
    }

    /// Creates or updates the DNS records and health check of an instance, based on the
    /// settings of the service.
    RegisterInstance, register_instance {
        input RegisterInstanceInput {
            service_id: String,
            instance_id: String,
            creator_request_id: String,
            attributes: HashMap<String, String>,
        }
        required [service_id, instance_id, attributes]
        output RegisterInstanceOutput { operation_id: String }
    }

    TagResource, tag_resource {
        input TagResourceInput {
            #[serde(rename = "ResourceARN")]
            resource_arn: String,
            tags: Vec<Tag>,
        }
        required [resource_arn, tags]
        output TagResourceOutput {}
    }

    UntagResource, untag_resource {
        input UntagResourceInput {
            #[serde(rename = "ResourceARN")]
            resource_arn: String,
            tag_keys: Vec<String>,
        }
        required [resource_arn, tag_keys]
        output UntagResourceOutput {}
    }

    /// Submits a request to change the health status of a custom health check to healthy or
    /// unhealthy.
    UpdateInstanceCustomHealthStatus, update_instance_custom_health_status {
        input UpdateInstanceCustomHealthStatusInput {
            service_id: String,
            instance_id: String,
            /// `HEALTHY` or `UNHEALTHY`
            status: String,
        }
        required [service_id, instance_id, status]
        output UpdateInstanceCustomHealthStatusOutput {}
    }

    /// Updates the DNS records or health check of a service and of all its instances.
    UpdateService, update_service {
        input UpdateServiceInput {
            id: String,
            service: ServiceChange,
        }
        required [id, service]
        output UpdateServiceOutput { operation_id: String }
    }
}

#[cfg(test)]
mod test {
    use super::{CreateServiceInput, RegisterInstanceInput};
    use crate::model::{DnsConfig, DnsRecord};
    use aws_http::json::marshal;
    use smithy_http::operation::BuildError;

    #[test]
    fn create_service_body() {
        let input = CreateServiceInput {
            name: Some("svc-1".to_string()),
            dns_config: Some(DnsConfig {
                namespace_id: Some("ns-1".to_string()),
                routing_policy: Some("MULTIVALUE".to_string()),
                dns_records: Some(vec![DnsRecord {
                    record_type: Some("A".to_string()),
                    ttl: Some(60),
                }]),
            }),
            ..Default::default()
        };
        let request =
            marshal("Route53AutoNaming_v20170314", "CreateService", &input).expect("valid input");
        assert_eq!(
            request.headers()["x-amz-target"],
            "Route53AutoNaming_v20170314.CreateService"
        );
        assert_eq!(
            std::str::from_utf8(request.body().bytes().unwrap()).unwrap(),
            r#"{"Name":"svc-1","DnsConfig":{"NamespaceId":"ns-1","RoutingPolicy":"MULTIVALUE","DnsRecords":[{"Type":"A","TTL":60}]}}"#
        );
    }

    #[test]
    fn register_instance_requires_attributes() {
        let input = RegisterInstanceInput {
            service_id: Some("srv-1".to_string()),
            instance_id: Some("i-1".to_string()),
            ..Default::default()
        };
        match input.validate() {
            Err(BuildError::MissingField { field, .. }) => assert_eq!(field, "attributes"),
            other => panic!("expected a missing field, got {:?}", other),
        }
    }
}
