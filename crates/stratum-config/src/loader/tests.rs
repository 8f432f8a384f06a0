//! Tests for document unification and decoding.

use super::*;
use pretty_assertions::assert_eq;
use std::collections::HashMap;

fn bundled(user: &str) -> Result<ServiceConfig, ConfigError> {
    let defaults = SchemaOverlay::bundled().expect("bundled");
    ServiceConfig::from_sources(&defaults, "user.json5", user)
}

fn custom(defaults: &str, user: &str) -> Result<ServiceConfig, ConfigError> {
    let overlay = SchemaOverlay::new().with_file("defaults/service.json5", defaults);
    ServiceConfig::from_sources(&overlay, "user.json5", user)
}

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// A minimal user document picks up every bundled default.
#[test]
fn bundled_defaults_fill_unset_fields() {
    let config = bundled(r#"{ service: { name: "svc" } }"#).expect("config");
    assert_eq!(config.name, "svc");
    assert_eq!(config.version, "0.0.0");
    assert_eq!(config.env, "development");
    assert_eq!(config.mode, "debug");
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.mongodb, None);
    assert_eq!(config.grpc, None);
    assert_eq!(config.http, None);
}

#[test]
fn bundled_overlay_contains_only_schema_documents() {
    let overlay = SchemaOverlay::bundled().expect("bundled");
    let paths: Vec<&str> = overlay.paths().collect();
    assert_eq!(
        paths,
        vec![
            "defaults/datastores.json5",
            "defaults/service.json5",
            "defaults/transport.json5",
        ]
    );
}

#[test]
fn user_values_refine_bundled_defaults() {
    let config = bundled(
        r#"{
            service: {
                name: "orders",
                title: "Order Service",
                mode: "release",
                logging: { level: "warn" },
                mongodb: { dbName: "orders", hosts: ["mongo-0:27017", "mongo-1:27017"] },
                grpc: {
                    clients: { billing: { address: "billing:50051" } },
                    servers: { main: { features: { reflection: true } } },
                },
                http: { servers: { main: {}, admin: { port: 9090 } } },
            },
        }"#,
    )
    .expect("config");

    assert_eq!(config.title, "Order Service");
    assert_eq!(config.mode, "release");
    assert_eq!(config.logging.level, "warn");

    let mongodb = config.mongodb.as_ref().expect("mongodb");
    assert_eq!(mongodb.uri, "mongodb://localhost:27017");
    assert_eq!(mongodb.db_name, "orders");
    assert_eq!(mongodb.hosts, vec!["mongo-0:27017", "mongo-1:27017"]);
    assert_eq!(mongodb.options.replica_set, "");

    let grpc = config.grpc.as_ref().expect("grpc");
    assert_eq!(grpc.clients["billing"].address, "billing:50051");
    assert_eq!(grpc.servers["main"].port, 50051);
    assert!(grpc.servers["main"].features.reflection);
    assert!(grpc.servers["main"].features.health_check);

    let http = config.http.as_ref().expect("http");
    assert_eq!(http.servers["main"].port, 8080);
    assert_eq!(http.servers["admin"].port, 9090);
}

#[test]
fn missing_service_field_is_reported() {
    let err = custom("{ other: {} }", "{ other: {} }").unwrap_err();
    match err {
        ConfigError::MissingField { path } => assert_eq!(path, "service"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn required_name_must_be_supplied() {
    let err = bundled("{ service: {} }").unwrap_err();
    match err {
        ConfigError::MissingField { path } => assert_eq!(path, "service.name"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn client_entries_need_an_address() {
    let err = bundled(r#"{ service: { name: "svc", grpc: { clients: { billing: {} } } } }"#)
        .unwrap_err();
    match err {
        ConfigError::MissingField { path } => {
            assert_eq!(path, "service.grpc.clients.billing.address")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn conflicting_concrete_default_is_a_schema_error() {
    let err = custom(
        r#"{ service: { name: "svc", logging: { level: "warn" } } }"#,
        r#"{ service: { logging: { level: "debug" } } }"#,
    )
    .unwrap_err();
    match err {
        ConfigError::Schema { path, .. } => assert_eq!(path, "service.logging.level"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_user_fields_are_rejected() {
    let err = bundled(r#"{ service: { name: "svc", mongo: {} } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("service.mongo"));
    assert!(msg.contains("field not allowed"));
}

#[test]
fn shape_mismatch_is_a_decode_error() {
    let err = custom(r#"{ service: { name: "svc", host: 5 } }"#, "{}").unwrap_err();
    assert!(matches!(err, ConfigError::DecodeFailed(_)));
}

#[test]
fn malformed_user_document_is_a_parse_error() {
    let err = bundled("{ service: { name: ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseFailed { .. }));
}

#[test]
fn env_overrides_document_default() {
    let mut config = custom(
        r#"{ service: { name: "svc", logging: { level: "warn" } } }"#,
        "{}",
    )
    .expect("config");
    assert_eq!(config.logging.level, "warn");

    config
        .apply_env_from(&env(&[("LOG_LEVEL", "debug")]))
        .expect("overlay");
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn env_overrides_keyed_server_port() {
    let user = r#"{ service: { name: "svc", grpc: { servers: { main: {} } } } }"#;

    let mut config = bundled(user).expect("config");
    config.apply_env_from(&env(&[])).expect("overlay");
    assert_eq!(config.grpc.as_ref().expect("grpc").servers["main"].port, 50051);

    let mut config = bundled(user).expect("config");
    config
        .apply_env_from(&env(&[("MAIN_GRPC_PORT", "50052"), ("GRPC_PORT", "1")]))
        .expect("overlay");
    assert_eq!(config.grpc.as_ref().expect("grpc").servers["main"].port, 50052);
}

#[test]
fn env_cannot_create_absent_sections() {
    let mut config = bundled(r#"{ service: { name: "svc" } }"#).expect("config");
    config
        .apply_env_from(&env(&[("MONGODB_URI", "mongodb://elsewhere")]))
        .expect("overlay");
    assert_eq!(config.mongodb, None);
}

#[test]
fn precedence_holds_for_every_leaf_kind() {
    let user = r#"{
        service: {
            name: "svc",
            host: "10.0.0.1",
            etcd: { timeout: 10 },
            prometheus: { grpcMetrics: true },
        },
    }"#;

    let config = bundled(user).expect("config");
    assert_eq!(config.host, "10.0.0.1");
    assert_eq!(config.etcd.as_ref().expect("etcd").timeout, 10);
    assert!(config.prometheus.as_ref().expect("prometheus").grpc_metrics);

    let mut config = bundled(user).expect("config");
    let applied = config
        .apply_env_from(&env(&[
            ("HOST", "127.0.0.1"),
            ("ETCD_TIMEOUT", "30"),
            ("PROMETHEUS_GRPC_METRICS", "false"),
        ]))
        .expect("overlay");
    assert_eq!(applied, 3);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.etcd.as_ref().expect("etcd").timeout, 30);
    assert!(!config.prometheus.as_ref().expect("prometheus").grpc_metrics);
}
