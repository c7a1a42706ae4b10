//! # Pod Schema Rules
//!
//! The one supported schema version, as static rule tables. Each
//! mapping-shaped context is a [`MappingRule`]; its [`Field`] entries give
//! both the dispatch table and the required-key set.
//!
//! | Context | Required |
//! |---|---|
//! | document | apiVersion, kind, metadata, spec |
//! | metadata | name |
//! | spec | containers |
//! | container | name, image, resources |
//! | port | containerPort |
//! | probe | httpGet |
//! | httpGet | path, port |
//! | resources, requests/limits, labels | none |

use podlint_core::{ExpectedType, Node};

use crate::checks;
use crate::context::ValidationContext;
use crate::walker::{walk_mapping, walk_sequence, Field, MappingRule};

/// Field name used for diagnostics about the document root itself.
pub const ROOT_FIELD: &str = "(root)";

const PORT_MIN: i64 = 0;
const PORT_MAX: i64 = 65535;
const CPU_MIN: i64 = 1;

pub static POD: MappingRule = MappingRule {
    name: "pod",
    fields: &[
        Field::required("apiVersion", api_version),
        Field::required("kind", kind),
        Field::required("metadata", metadata),
        Field::required("spec", spec),
    ],
    other: None,
};

pub static METADATA: MappingRule = MappingRule {
    name: "metadata",
    fields: &[
        Field::required("name", metadata_name),
        Field::optional("labels", labels),
    ],
    other: None,
};

pub static LABELS: MappingRule = MappingRule {
    name: "labels",
    fields: &[],
    other: Some(label_value),
};

pub static SPEC: MappingRule = MappingRule {
    name: "spec",
    fields: &[
        Field::optional("os", os),
        Field::required("containers", containers),
    ],
    other: None,
};

pub static CONTAINER: MappingRule = MappingRule {
    name: "container",
    fields: &[
        Field::required("name", container_name),
        Field::required("image", checks::check_image),
        Field::optional("ports", ports),
        Field::optional("readinessProbe", probe),
        Field::optional("livenessProbe", probe),
        Field::required("resources", resources),
    ],
    other: None,
};

pub static CONTAINER_PORT: MappingRule = MappingRule {
    name: "containerPort",
    fields: &[
        Field::required("containerPort", port_number),
        Field::optional("protocol", protocol),
    ],
    other: None,
};

pub static PROBE: MappingRule = MappingRule {
    name: "probe",
    fields: &[Field::required("httpGet", http_get)],
    other: None,
};

pub static HTTP_GET: MappingRule = MappingRule {
    name: "httpGet",
    fields: &[
        Field::required("path", checks::check_http_path),
        Field::required("port", port_number),
    ],
    other: None,
};

pub static RESOURCES: MappingRule = MappingRule {
    name: "resources",
    fields: &[
        Field::optional("requests", resource_declaration),
        Field::optional("limits", resource_declaration),
    ],
    other: None,
};

pub static RESOURCE_DECLARATION: MappingRule = MappingRule {
    name: "resourceDeclaration",
    fields: &[Field::optional("cpu", cpu), Field::optional("memory", memory)],
    other: None,
};

/// Validate one document root against the Pod schema.
pub fn validate_pod(ctx: &mut ValidationContext, doc: &Node) {
    walk_mapping(ctx, ROOT_FIELD, doc, &POD);
}

fn api_version(ctx: &mut ValidationContext, _key: &Node, value: &Node) {
    checks::check_enum(ctx, "apiVersion", value, &["v1"], value.line);
}

fn kind(ctx: &mut ValidationContext, _key: &Node, value: &Node) {
    checks::check_enum(ctx, "kind", value, &["Pod"], value.line);
}

fn metadata(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    walk_mapping(ctx, key.text(), value, &METADATA);
}

fn metadata_name(ctx: &mut ValidationContext, _key: &Node, value: &Node) {
    checks::check_name(ctx, value, false);
}

fn labels(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    walk_mapping(ctx, key.text(), value, &LABELS);
}

fn label_value(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    if !value.is_scalar() {
        ctx.type_mismatch(key.text(), ExpectedType::String, key.line);
    }
}

fn spec(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    walk_mapping(ctx, key.text(), value, &SPEC);
}

fn os(ctx: &mut ValidationContext, _key: &Node, value: &Node) {
    checks::check_enum(ctx, "os", value, &["linux", "windows"], value.line);
}

fn containers(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    walk_sequence(ctx, key.text(), value, container);
}

fn container(ctx: &mut ValidationContext, item: &Node) {
    walk_mapping(ctx, "container", item, &CONTAINER);
}

fn container_name(ctx: &mut ValidationContext, _key: &Node, value: &Node) {
    checks::check_name(ctx, value, true);
}

fn ports(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    walk_sequence(ctx, key.text(), value, container_port);
}

fn container_port(ctx: &mut ValidationContext, item: &Node) {
    walk_mapping(ctx, "port", item, &CONTAINER_PORT);
}

fn port_number(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    checks::check_int_range(ctx, key, value, PORT_MIN, PORT_MAX);
}

fn protocol(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    checks::check_enum(ctx, key.text(), value, &["TCP", "UDP"], key.line);
}

fn probe(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    walk_mapping(ctx, key.text(), value, &PROBE);
}

fn http_get(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    walk_mapping(ctx, key.text(), value, &HTTP_GET);
}

fn resources(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    walk_mapping(ctx, key.text(), value, &RESOURCES);
}

fn resource_declaration(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    walk_mapping(ctx, key.text(), value, &RESOURCE_DECLARATION);
}

fn cpu(ctx: &mut ValidationContext, key: &Node, value: &Node) {
    checks::check_int_range(ctx, key, value, CPU_MIN, i64::MAX);
}

fn memory(ctx: &mut ValidationContext, _key: &Node, value: &Node) {
    checks::check_memory(ctx, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(rule: &MappingRule) -> Vec<&'static str> {
        rule.required().collect()
    }

    #[test]
    fn required_sets_match_the_schema() {
        assert_eq!(required(&POD), ["apiVersion", "kind", "metadata", "spec"]);
        assert_eq!(required(&METADATA), ["name"]);
        assert_eq!(required(&SPEC), ["containers"]);
        assert_eq!(required(&CONTAINER), ["name", "image", "resources"]);
        assert_eq!(required(&CONTAINER_PORT), ["containerPort"]);
        assert_eq!(required(&PROBE), ["httpGet"]);
        assert_eq!(required(&HTTP_GET), ["path", "port"]);
        assert!(required(&RESOURCES).is_empty());
        assert!(required(&RESOURCE_DECLARATION).is_empty());
        assert!(required(&LABELS).is_empty());
    }

    #[test]
    fn only_labels_accepts_arbitrary_keys() {
        for rule in [
            &POD,
            &METADATA,
            &SPEC,
            &CONTAINER,
            &CONTAINER_PORT,
            &PROBE,
            &HTTP_GET,
            &RESOURCES,
            &RESOURCE_DECLARATION,
        ] {
            assert!(rule.other.is_none(), "{} has a catch-all", rule.name);
        }
        assert!(LABELS.other.is_some());
    }

    #[test]
    fn both_probe_kinds_share_the_probe_rule() {
        assert!(CONTAINER.field("readinessProbe").is_some());
        assert!(CONTAINER.field("livenessProbe").is_some());
        assert!(CONTAINER.field("startupProbe").is_none());
    }
}
