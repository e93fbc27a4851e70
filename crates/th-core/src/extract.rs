//! Resource identifier extraction.
//!
//! A flat, data-driven table maps audit event names to extraction rules.
//! Each rule names the top-level detail field to read, a traversal path
//! into it, and the human-readable label for the extracted value.
//! Create/delete/update variants of the same resource type share one
//! rule. The table is not exhaustive over all event types; adding
//! support for a new one means adding one entry.

use serde_json::Value;

use crate::path::{lookup_str, PathStep};
use PathStep::{First, Key};

/// Which top-level field of the audit record a rule reads.
///
/// Most creation/deletion events report the identifier in
/// `responseElements`; secret creation is the exception, where the name
/// is supplied by the caller in `requestParameters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSource {
    ResponseElements,
    RequestParameters,
}

impl DetailSource {
    /// The detail field this source reads from.
    pub fn field(&self) -> &'static str {
        match self {
            DetailSource::ResponseElements => "responseElements",
            DetailSource::RequestParameters => "requestParameters",
        }
    }
}

/// How to pull a resource identifier out of an audit record.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRule {
    /// Human-readable label for the extracted value, e.g. `Instance_ID`.
    pub label: &'static str,
    /// Which top-level detail field to read.
    pub source: DetailSource,
    /// Traversal path within that field.
    pub path: &'static [PathStep],
}

/// The extracted (label, value) pair.
///
/// Both parts empty means "no resource identifier available for this
/// event" - the default for unregistered event types and missing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceIdentifier {
    pub key: String,
    pub value: String,
}

impl ResourceIdentifier {
    /// The empty identifier.
    pub fn none() -> Self {
        Self::default()
    }

    /// True when no identifier could be extracted.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() || self.value.is_empty()
    }
}

/// The extraction table: grouped event names and their shared rule.
const RULES: &[(&[&str], ExtractionRule)] = &[
    (
        &["TerminateInstances", "RunInstances"],
        ExtractionRule {
            label: "Instance_ID",
            source: DetailSource::ResponseElements,
            path: &[Key("instancesSet"), Key("items"), First, Key("instanceId")],
        },
    ),
    (
        &["CreateDBInstance", "DeleteDBInstance"],
        ExtractionRule {
            label: "DB_Instance_ID",
            source: DetailSource::ResponseElements,
            path: &[Key("dBInstanceIdentifier")],
        },
    ),
    (
        &["CreateLoadBalancer", "DeleteLoadBalancer"],
        ExtractionRule {
            label: "LoadBalancer_ID",
            source: DetailSource::ResponseElements,
            path: &[Key("loadBalancers"), First, Key("loadBalancerName")],
        },
    ),
    (
        &["CreateUser", "DeleteUser"],
        ExtractionRule {
            label: "User_ID",
            source: DetailSource::ResponseElements,
            path: &[Key("user"), Key("userName")],
        },
    ),
    (
        &["CreateGroup", "DeleteGroup"],
        ExtractionRule {
            label: "Group",
            source: DetailSource::ResponseElements,
            path: &[Key("group"), Key("groupName")],
        },
    ),
    (
        &["CreateRole", "DeleteRole"],
        ExtractionRule {
            label: "Role",
            source: DetailSource::ResponseElements,
            path: &[Key("role"), Key("roleName")],
        },
    ),
    (
        &["CreatePolicy", "DeletePolicy"],
        ExtractionRule {
            label: "Policy",
            source: DetailSource::ResponseElements,
            path: &[Key("policy"), Key("policyName")],
        },
    ),
    (
        &["CreateCluster", "DeleteCluster"],
        ExtractionRule {
            label: "Cluster",
            source: DetailSource::ResponseElements,
            path: &[Key("cluster"), Key("clusterName")],
        },
    ),
    (
        &["CreateRestApi", "DeleteRestApi"],
        ExtractionRule {
            label: "RestApi",
            source: DetailSource::ResponseElements,
            path: &[Key("id")],
        },
    ),
    (
        &["CreatePipeline", "DeletePipeline"],
        ExtractionRule {
            label: "Pipeline",
            source: DetailSource::ResponseElements,
            path: &[Key("pipeline"), Key("pipelineName")],
        },
    ),
    (
        &["CreateProject", "DeleteProject", "UpdateProject"],
        ExtractionRule {
            label: "Project",
            source: DetailSource::ResponseElements,
            path: &[Key("project"), Key("projectName")],
        },
    ),
    (
        &["CreateApplication", "DeleteApplication"],
        ExtractionRule {
            label: "Application",
            source: DetailSource::ResponseElements,
            path: &[Key("application"), Key("applicationName")],
        },
    ),
    (
        &["CreateHostedZone", "DeleteHostedZone"],
        ExtractionRule {
            label: "HostedZone",
            source: DetailSource::ResponseElements,
            path: &[Key("hostedZone"), Key("id")],
        },
    ),
    (
        // The secret name is only echoed back on deletion; on creation it
        // comes from the caller's request.
        &["CreateSecret"],
        ExtractionRule {
            label: "Secret_ID",
            source: DetailSource::RequestParameters,
            path: &[Key("name")],
        },
    ),
    (
        &["DeleteSecret"],
        ExtractionRule {
            label: "Secret_ID",
            source: DetailSource::ResponseElements,
            path: &[Key("name")],
        },
    ),
    (
        &["CreateRepository", "DeleteRepository"],
        ExtractionRule {
            label: "Repository Name",
            source: DetailSource::ResponseElements,
            path: &[Key("repository"), Key("repositoryName")],
        },
    ),
    (
        &["CreateAutoScalingGroup", "DeleteAutoScalingGroup"],
        ExtractionRule {
            label: "AutoScalingGroup",
            source: DetailSource::ResponseElements,
            path: &[Key("autoScalingGroupName")],
        },
    ),
];

/// Looks up the extraction rule registered for an event name.
pub fn rule_for(event_name: &str) -> Option<&'static ExtractionRule> {
    RULES
        .iter()
        .find(|(names, _)| names.contains(&event_name))
        .map(|(_, rule)| rule)
}

/// Extracts a resource identifier from an audit record.
///
/// Unregistered event names, missing intermediate fields, empty lists,
/// and type mismatches all resolve to the empty identifier; extraction
/// never fails.
pub fn extract_resource(event_name: &str, detail: &Value) -> ResourceIdentifier {
    let Some(rule) = rule_for(event_name) else {
        return ResourceIdentifier::none();
    };

    let value = detail
        .get(rule.source.field())
        .and_then(|root| lookup_str(root, rule.path))
        .filter(|value| !value.is_empty());

    match value {
        Some(value) => ResourceIdentifier {
            key: rule.label.to_string(),
            value: value.to_string(),
        },
        None => ResourceIdentifier::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_event_returns_empty() {
        let detail = serde_json::json!({"responseElements": {"id": "whatever"}});
        let resource = extract_resource("UnknownThing", &detail);
        assert!(resource.is_empty());
        assert_eq!(resource, ResourceIdentifier::none());
    }

    #[test]
    fn test_run_instances_first_item() {
        let detail = serde_json::json!({
            "responseElements": {
                "instancesSet": {
                    "items": [
                        {"instanceId": "i-0abc"},
                        {"instanceId": "i-0def"}
                    ]
                }
            }
        });

        let resource = extract_resource("RunInstances", &detail);
        assert_eq!(resource.key, "Instance_ID");
        assert_eq!(resource.value, "i-0abc");
    }

    #[test]
    fn test_terminate_instances_shares_rule() {
        let detail = serde_json::json!({
            "responseElements": {
                "instancesSet": { "items": [{"instanceId": "i-0abc"}] }
            }
        });

        let resource = extract_resource("TerminateInstances", &detail);
        assert_eq!(resource.key, "Instance_ID");
        assert_eq!(resource.value, "i-0abc");
    }

    #[test]
    fn test_run_instances_empty_item_list() {
        let detail = serde_json::json!({
            "responseElements": { "instancesSet": { "items": [] } }
        });
        assert!(extract_resource("RunInstances", &detail).is_empty());
    }

    #[test]
    fn test_missing_response_elements() {
        let detail = serde_json::json!({});
        assert!(extract_resource("RunInstances", &detail).is_empty());
        assert!(extract_resource("CreateDBInstance", &detail).is_empty());
    }

    #[test]
    fn test_type_mismatch_degrades() {
        let detail = serde_json::json!({
            "responseElements": { "instancesSet": "not an object" }
        });
        assert!(extract_resource("RunInstances", &detail).is_empty());

        let detail = serde_json::json!({"responseElements": "not an object"});
        assert!(extract_resource("CreateDBInstance", &detail).is_empty());
    }

    #[test]
    fn test_db_instance() {
        let detail = serde_json::json!({
            "responseElements": { "dBInstanceIdentifier": "prod-db-01" }
        });
        let resource = extract_resource("CreateDBInstance", &detail);
        assert_eq!(resource.key, "DB_Instance_ID");
        assert_eq!(resource.value, "prod-db-01");
    }

    #[test]
    fn test_load_balancer_first_entry() {
        let detail = serde_json::json!({
            "responseElements": {
                "loadBalancers": [{"loadBalancerName": "edge-lb"}]
            }
        });
        let resource = extract_resource("DeleteLoadBalancer", &detail);
        assert_eq!(resource.key, "LoadBalancer_ID");
        assert_eq!(resource.value, "edge-lb");
    }

    #[test]
    fn test_iam_entities() {
        let detail = serde_json::json!({
            "responseElements": { "user": { "userName": "new-user" } }
        });
        let resource = extract_resource("CreateUser", &detail);
        assert_eq!(resource.key, "User_ID");
        assert_eq!(resource.value, "new-user");

        let detail = serde_json::json!({
            "responseElements": { "group": { "groupName": "admins" } }
        });
        let resource = extract_resource("DeleteGroup", &detail);
        assert_eq!(resource.key, "Group");
        assert_eq!(resource.value, "admins");

        let detail = serde_json::json!({
            "responseElements": { "role": { "roleName": "deployer" } }
        });
        let resource = extract_resource("CreateRole", &detail);
        assert_eq!(resource.key, "Role");
        assert_eq!(resource.value, "deployer");

        let detail = serde_json::json!({
            "responseElements": { "policy": { "policyName": "readonly" } }
        });
        let resource = extract_resource("DeletePolicy", &detail);
        assert_eq!(resource.key, "Policy");
        assert_eq!(resource.value, "readonly");
    }

    #[test]
    fn test_cluster_and_rest_api() {
        let detail = serde_json::json!({
            "responseElements": { "cluster": { "clusterName": "workloads" } }
        });
        let resource = extract_resource("CreateCluster", &detail);
        assert_eq!(resource.key, "Cluster");
        assert_eq!(resource.value, "workloads");

        let detail = serde_json::json!({
            "responseElements": { "id": "ab12cd34" }
        });
        let resource = extract_resource("DeleteRestApi", &detail);
        assert_eq!(resource.key, "RestApi");
        assert_eq!(resource.value, "ab12cd34");
    }

    #[test]
    fn test_pipeline_project_application() {
        let detail = serde_json::json!({
            "responseElements": { "pipeline": { "pipelineName": "release" } }
        });
        assert_eq!(extract_resource("CreatePipeline", &detail).value, "release");

        let detail = serde_json::json!({
            "responseElements": { "project": { "projectName": "builder" } }
        });
        let resource = extract_resource("UpdateProject", &detail);
        assert_eq!(resource.key, "Project");
        assert_eq!(resource.value, "builder");

        let detail = serde_json::json!({
            "responseElements": { "application": { "applicationName": "web" } }
        });
        let resource = extract_resource("DeleteApplication", &detail);
        assert_eq!(resource.key, "Application");
        assert_eq!(resource.value, "web");
    }

    #[test]
    fn test_hosted_zone() {
        let detail = serde_json::json!({
            "responseElements": { "hostedZone": { "id": "/hostedzone/Z123" } }
        });
        let resource = extract_resource("CreateHostedZone", &detail);
        assert_eq!(resource.key, "HostedZone");
        assert_eq!(resource.value, "/hostedzone/Z123");
    }

    #[test]
    fn test_create_secret_reads_request_parameters() {
        // The response does not echo the name on creation.
        let detail = serde_json::json!({
            "requestParameters": { "name": "db-password" },
            "responseElements": { "arn": "arn:aws:secretsmanager:..." }
        });
        let resource = extract_resource("CreateSecret", &detail);
        assert_eq!(resource.key, "Secret_ID");
        assert_eq!(resource.value, "db-password");
    }

    #[test]
    fn test_delete_secret_reads_response_elements() {
        let detail = serde_json::json!({
            "responseElements": { "name": "db-password" }
        });
        let resource = extract_resource("DeleteSecret", &detail);
        assert_eq!(resource.key, "Secret_ID");
        assert_eq!(resource.value, "db-password");
    }

    #[test]
    fn test_repository_and_autoscaling_group() {
        let detail = serde_json::json!({
            "responseElements": { "repository": { "repositoryName": "images" } }
        });
        let resource = extract_resource("CreateRepository", &detail);
        assert_eq!(resource.key, "Repository Name");
        assert_eq!(resource.value, "images");

        let detail = serde_json::json!({
            "responseElements": { "autoScalingGroupName": "web-asg" }
        });
        let resource = extract_resource("DeleteAutoScalingGroup", &detail);
        assert_eq!(resource.key, "AutoScalingGroup");
        assert_eq!(resource.value, "web-asg");
    }

    #[test]
    fn test_empty_string_value_treated_as_missing() {
        let detail = serde_json::json!({
            "responseElements": { "dBInstanceIdentifier": "" }
        });
        assert!(extract_resource("CreateDBInstance", &detail).is_empty());
    }

    #[test]
    fn test_rule_for_groups() {
        assert!(rule_for("RunInstances").is_some());
        assert!(rule_for("TerminateInstances").is_some());
        assert_eq!(
            rule_for("RunInstances").unwrap().label,
            rule_for("TerminateInstances").unwrap().label
        );
        assert!(rule_for("NotARealEvent").is_none());
    }

    #[test]
    fn test_every_rule_degrades_on_empty_detail() {
        let detail = serde_json::json!({});
        for (names, _) in super::RULES {
            for name in *names {
                assert!(
                    extract_resource(name, &detail).is_empty(),
                    "rule for {} should degrade to empty",
                    name
                );
            }
        }
    }
}
