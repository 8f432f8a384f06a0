//! Typed service configuration.

use crate::ConfigError;
use crate::env::{EnvBindings, OverlayVisitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolved configuration of a service process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
    /// Deployment environment. Env: `ENV`.
    #[serde(default)]
    pub env: String,
    /// Run mode. Env: `MODE`.
    #[serde(default)]
    pub mode: String,
    /// Bind address. Env: `HOST`.
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mongodb: Option<MongodbConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postgres: Option<PostgresConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etcd: Option<EtcdConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rabbitmq: Option<RabbitMqConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prometheus: Option<PrometheusConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc: Option<GrpcConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpConfig>,
}

impl EnvBindings for ServiceConfig {
    fn visit_env(&mut self, visitor: &mut OverlayVisitor<'_>) -> Result<(), ConfigError> {
        visitor.leaf("env", &mut self.env)?;
        visitor.leaf("mode", &mut self.mode)?;
        visitor.leaf("host", &mut self.host)?;
        visitor.section(&mut self.logging)?;
        visitor.optional(&mut self.mongodb)?;
        visitor.optional(&mut self.postgres)?;
        visitor.optional(&mut self.etcd)?;
        visitor.optional(&mut self.rabbitmq)?;
        visitor.optional(&mut self.prometheus)?;
        visitor.optional(&mut self.grpc)?;
        visitor.optional(&mut self.http)
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Env: `LOG_LEVEL`.
    pub level: String,
}

impl EnvBindings for LoggingConfig {
    fn visit_env(&mut self, visitor: &mut OverlayVisitor<'_>) -> Result<(), ConfigError> {
        visitor.leaf("log_level", &mut self.level)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct MongodbOptions {
    pub replica_set: String,
}

/// MongoDB connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct MongodbConfig {
    /// Env: `MONGODB_URI`.
    pub uri: String,
    /// Env: `MONGODB_USERNAME`.
    pub username: String,
    /// Env: `MONGODB_PASSWORD`.
    pub password: String,
    /// Env: `MONGODB_DBNAME`.
    pub db_name: String,
    pub hosts: Vec<String>,
    pub options: MongodbOptions,
}

impl EnvBindings for MongodbConfig {
    fn visit_env(&mut self, visitor: &mut OverlayVisitor<'_>) -> Result<(), ConfigError> {
        visitor.leaf("mongodb_uri", &mut self.uri)?;
        visitor.leaf("mongodb_username", &mut self.username)?;
        visitor.leaf("mongodb_password", &mut self.password)?;
        visitor.leaf("mongodb_dbname", &mut self.db_name)
    }
}

/// PostgreSQL connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PostgresConfig {
    /// Env: `POSTGRES_URI`.
    pub uri: String,
}

impl EnvBindings for PostgresConfig {
    fn visit_env(&mut self, visitor: &mut OverlayVisitor<'_>) -> Result<(), ConfigError> {
        visitor.leaf("postgres_uri", &mut self.uri)
    }
}

/// etcd client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EtcdConfig {
    pub endpoints: String,
    pub username: String,
    pub password: String,
    /// Dial timeout in seconds.
    pub timeout: i64,
}

impl EnvBindings for EtcdConfig {
    fn visit_env(&mut self, visitor: &mut OverlayVisitor<'_>) -> Result<(), ConfigError> {
        visitor.leaf("etcd_endpoints", &mut self.endpoints)?;
        visitor.leaf("etcd_username", &mut self.username)?;
        visitor.leaf("etcd_password", &mut self.password)?;
        visitor.leaf("etcd_timeout", &mut self.timeout)
    }
}

/// RabbitMQ connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RabbitMqConfig {
    /// Env: `RABBITMQ_URI`.
    pub uri: String,
}

impl EnvBindings for RabbitMqConfig {
    fn visit_env(&mut self, visitor: &mut OverlayVisitor<'_>) -> Result<(), ConfigError> {
        visitor.leaf("rabbitmq_uri", &mut self.uri)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PrometheusConfig {
    /// Env: `PROMETHEUS_GRPC_METRICS`.
    pub grpc_metrics: bool,
}

impl EnvBindings for PrometheusConfig {
    fn visit_env(&mut self, visitor: &mut OverlayVisitor<'_>) -> Result<(), ConfigError> {
        visitor.leaf("prometheus_grpc_metrics", &mut self.grpc_metrics)
    }
}

/// gRPC clients and servers, keyed by instance name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GrpcConfig {
    pub clients: BTreeMap<String, GrpcClientConfig>,
    pub servers: BTreeMap<String, GrpcServerConfig>,
}

impl EnvBindings for GrpcConfig {
    fn visit_env(&mut self, visitor: &mut OverlayVisitor<'_>) -> Result<(), ConfigError> {
        visitor.keyed(&mut self.clients)?;
        visitor.keyed(&mut self.servers)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GrpcClientConfig {
    /// Env: `<KEY>_GRPC_CLIENT_ADDRESS`.
    pub address: String,
}

impl EnvBindings for GrpcClientConfig {
    fn visit_env(&mut self, visitor: &mut OverlayVisitor<'_>) -> Result<(), ConfigError> {
        visitor.leaf("grpc_client_address", &mut self.address)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct GrpcFeatures {
    pub reflection: bool,
    pub health_check: bool,
    pub logging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GrpcServerConfig {
    /// Env: `<KEY>_GRPC_PORT`.
    pub port: i64,
    pub features: GrpcFeatures,
}

impl EnvBindings for GrpcServerConfig {
    fn visit_env(&mut self, visitor: &mut OverlayVisitor<'_>) -> Result<(), ConfigError> {
        visitor.leaf("grpc_port", &mut self.port)
    }
}

/// HTTP servers keyed by instance name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HttpConfig {
    pub servers: BTreeMap<String, HttpServerConfig>,
}

impl EnvBindings for HttpConfig {
    fn visit_env(&mut self, visitor: &mut OverlayVisitor<'_>) -> Result<(), ConfigError> {
        visitor.keyed(&mut self.servers)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HttpServerConfig {
    /// Env: `<KEY>_HTTP_PORT`.
    pub port: i64,
}

impl EnvBindings for HttpServerConfig {
    fn visit_env(&mut self, visitor: &mut OverlayVisitor<'_>) -> Result<(), ConfigError> {
        visitor.leaf("http_port", &mut self.port)
    }
}
