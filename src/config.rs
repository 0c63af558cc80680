//! Configuration model for a generation run.
//! Describes which delivery handlers, workers and dependencies each module
//! of the generated service gets, plus the header metadata shared by every
//! rendered file.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Datelike;
use clap::ValueEnum;
use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GO_VERSION, PLUGIN_PACKAGE_PREFIX};
use crate::error::{Error, Result};
use crate::naming::{clean_path_segment, validate_name};
use crate::params::InvocationParameters;

/// Delivery mechanisms a module can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryKind {
    Rest,
    Grpc,
    GraphQL,
}

impl DeliveryKind {
    pub const ALL: [DeliveryKind; 3] = [DeliveryKind::Rest, DeliveryKind::Grpc, DeliveryKind::GraphQL];

    /// Package directory under `delivery/`.
    pub fn package(self) -> &'static str {
        match self {
            DeliveryKind::Rest => "resthandler",
            DeliveryKind::Grpc => "grpchandler",
            DeliveryKind::GraphQL => "graphqlhandler",
        }
    }

    pub fn is_enabled(self, handlers: &HandlerConfig) -> bool {
        match self {
            DeliveryKind::Rest => handlers.rest_handler || handlers.fiber_rest_handler,
            DeliveryKind::Grpc => handlers.grpc_handler,
            DeliveryKind::GraphQL => handlers.graphql_handler,
        }
    }
}

/// Background worker mechanisms, declared in canonical registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerKind {
    Kafka,
    Scheduler,
    RedisSubscriber,
    TaskQueue,
    PostgresListener,
    RabbitMq,
}

impl WorkerKind {
    pub const ALL: [WorkerKind; 6] = [
        WorkerKind::Kafka,
        WorkerKind::Scheduler,
        WorkerKind::RedisSubscriber,
        WorkerKind::TaskQueue,
        WorkerKind::PostgresListener,
        WorkerKind::RabbitMq,
    ];

    /// Symbol used to register the worker in generated code.
    pub fn identifier(self) -> &'static str {
        match self {
            WorkerKind::Kafka => "types.Kafka",
            WorkerKind::Scheduler => "types.Scheduler",
            WorkerKind::RedisSubscriber => "types.RedisSubscriber",
            WorkerKind::TaskQueue => "types.TaskQueue",
            WorkerKind::PostgresListener => "types.PostgresListener",
            WorkerKind::RabbitMq => "types.RabbitMQ",
        }
    }

    pub fn constructor(self) -> &'static str {
        match self {
            WorkerKind::Kafka => "NewKafkaHandler",
            WorkerKind::Scheduler => "NewCronHandler",
            WorkerKind::RedisSubscriber => "NewRedisHandler",
            WorkerKind::TaskQueue => "NewTaskQueueHandler",
            WorkerKind::PostgresListener => "NewPostgresListenerHandler",
            WorkerKind::RabbitMq => "NewRabbitMQHandler",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            WorkerKind::Kafka => "kafka_handler.go",
            WorkerKind::Scheduler => "cron_handler.go",
            WorkerKind::RedisSubscriber => "redis_handler.go",
            WorkerKind::TaskQueue => "taskqueue_handler.go",
            WorkerKind::PostgresListener => "postgres_listener_handler.go",
            WorkerKind::RabbitMq => "rabbitmq_handler.go",
        }
    }

    pub fn is_enabled(self, handlers: &HandlerConfig) -> bool {
        match self {
            WorkerKind::Kafka => handlers.kafka_handler,
            WorkerKind::Scheduler => handlers.scheduler_handler,
            WorkerKind::RedisSubscriber => handlers.redis_subs_handler,
            WorkerKind::TaskQueue => handlers.task_queue_handler,
            WorkerKind::PostgresListener => handlers.postgres_listener_handler,
            WorkerKind::RabbitMq => handlers.rabbitmq_handler,
        }
    }

    fn flag_mut(self, handlers: &mut HandlerConfig) -> &mut bool {
        match self {
            WorkerKind::Kafka => &mut handlers.kafka_handler,
            WorkerKind::Scheduler => &mut handlers.scheduler_handler,
            WorkerKind::RedisSubscriber => &mut handlers.redis_subs_handler,
            WorkerKind::TaskQueue => &mut handlers.task_queue_handler,
            WorkerKind::PostgresListener => &mut handlers.postgres_listener_handler,
            WorkerKind::RabbitMq => &mut handlers.rabbitmq_handler,
        }
    }
}

/// Datastores a service can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dependency {
    Redis,
    Sql,
    Mongo,
    Arango,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDriver {
    #[default]
    Postgres,
    Mysql,
    Sqlite3,
}

impl SqlDriver {
    pub fn name(self) -> &'static str {
        match self {
            SqlDriver::Postgres => "postgres",
            SqlDriver::Mysql => "mysql",
            SqlDriver::Sqlite3 => "sqlite3",
        }
    }

    /// Go package registering the database/sql driver.
    pub fn driver_package(self) -> &'static str {
        match self {
            SqlDriver::Postgres => "github.com/lib/pq",
            SqlDriver::Mysql => "github.com/go-sql-driver/mysql",
            SqlDriver::Sqlite3 => "github.com/mattn/go-sqlite3",
        }
    }

    /// Go package providing the GORM dialector.
    pub fn gorm_package(self) -> &'static str {
        match self {
            SqlDriver::Postgres => "gorm.io/driver/postgres",
            SqlDriver::Mysql => "gorm.io/driver/mysql",
            SqlDriver::Sqlite3 => "gorm.io/driver/sqlite",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum License {
    #[default]
    Mit,
    Apache,
    Private,
}

impl License {
    pub fn template_name(self) -> &'static str {
        match self {
            License::Mit => "license/mit",
            License::Apache => "license/apache",
            License::Private => "license/private",
        }
    }
}

/// Worker plugin supplied from outside the built-in worker set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerPlugin {
    pub name: String,
    pub package_path: String,
}

impl WorkerPlugin {
    /// Parses `name` or `name=import/path`.
    pub fn parse(spec: &str) -> Result<Self> {
        let (name, package_path) = match spec.split_once('=') {
            Some((name, path)) => (name.trim().to_string(), path.trim().to_string()),
            None => {
                let name = spec.trim().to_string();
                let path = format!("{PLUGIN_PACKAGE_PREFIX}/{name}");
                (name, path)
            }
        };
        validate_name("worker plugin", &name)?;
        if package_path.is_empty() {
            return Err(Error::ConfigError(format!(
                "worker plugin '{name}' has an empty import path"
            )));
        }
        Ok(Self { name, package_path })
    }

    pub fn identifier(&self) -> String {
        format!("types.Worker(\"{}\")", self.name)
    }

    pub fn file_name(&self) -> String {
        format!("plugin_{}_handler.go", self.name)
    }
}

/// Activation flags for every handler and dependency kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    pub rest_handler: bool,
    pub grpc_handler: bool,
    pub graphql_handler: bool,
    pub fiber_rest_handler: bool,
    pub kafka_handler: bool,
    pub scheduler_handler: bool,
    pub redis_subs_handler: bool,
    pub task_queue_handler: bool,
    pub postgres_listener_handler: bool,
    pub rabbitmq_handler: bool,
    pub redis_deps: bool,
    pub sql_deps: bool,
    pub mongo_deps: bool,
    pub sql_use_gorm: bool,
    pub arango_deps: bool,
    pub sql_driver: SqlDriver,
    pub worker_plugins: Vec<String>,
}

impl HandlerConfig {
    /// True iff any worker flag is set or at least one plugin is configured.
    /// Derived from the current flags on every call.
    pub fn is_worker_active(&self) -> bool {
        WorkerKind::ALL.iter().any(|kind| kind.is_enabled(self)) || !self.worker_plugins.is_empty()
    }

    pub fn is_delivery_active(&self) -> bool {
        DeliveryKind::ALL.iter().any(|kind| kind.is_enabled(self))
    }

    /// Active workers in canonical order.
    pub fn active_workers(&self) -> Vec<WorkerKind> {
        WorkerKind::ALL.into_iter().filter(|kind| kind.is_enabled(self)).collect()
    }

    pub fn active_deliveries(&self) -> Vec<DeliveryKind> {
        DeliveryKind::ALL.into_iter().filter(|kind| kind.is_enabled(self)).collect()
    }

    /// Resets every delivery and worker flag, plugins included.
    pub fn disable_handlers(&mut self) {
        self.rest_handler = false;
        self.grpc_handler = false;
        self.graphql_handler = false;
        self.fiber_rest_handler = false;
        for kind in WorkerKind::ALL {
            *kind.flag_mut(self) = false;
        }
        self.worker_plugins.clear();
    }

    pub fn enable_dependency(&mut self, dependency: Dependency) {
        match dependency {
            Dependency::Redis => self.redis_deps = true,
            Dependency::Sql => self.sql_deps = true,
            Dependency::Mongo => self.mongo_deps = true,
            Dependency::Arango => self.arango_deps = true,
        }
    }

    /// OR-merges every flag of `other` into `self`; plugins are appended
    /// without duplicates, keeping first-seen order.
    pub fn merge(&mut self, other: &HandlerConfig) {
        self.merge_handlers(other);
        self.redis_deps |= other.redis_deps;
        self.sql_deps |= other.sql_deps;
        self.mongo_deps |= other.mongo_deps;
        self.sql_use_gorm |= other.sql_use_gorm;
        self.arango_deps |= other.arango_deps;
    }

    /// OR-merges only delivery and worker flags.
    pub fn merge_handlers(&mut self, other: &HandlerConfig) {
        self.rest_handler |= other.rest_handler;
        self.grpc_handler |= other.grpc_handler;
        self.graphql_handler |= other.graphql_handler;
        self.fiber_rest_handler |= other.fiber_rest_handler;
        for kind in WorkerKind::ALL {
            *kind.flag_mut(self) |= kind.is_enabled(other);
        }
        for plugin in &other.worker_plugins {
            if !self.worker_plugins.contains(plugin) {
                self.worker_plugins.push(plugin.clone());
            }
        }
    }

    /// Copy of `self` whose delivery and worker set is replaced by `other`'s.
    pub fn with_handlers_of(&self, other: &HandlerConfig) -> HandlerConfig {
        let mut handlers = self.clone();
        handlers.disable_handlers();
        handlers.merge_handlers(other);
        handlers
    }

    /// Recovers the delivery and worker set of an already generated module
    /// from the handler packages present on disk.
    pub fn detect<P: AsRef<Path>>(module_dir: P) -> HandlerConfig {
        let delivery_dir = module_dir.as_ref().join("delivery");
        let mut handlers = HandlerConfig {
            rest_handler: delivery_dir.join(DeliveryKind::Rest.package()).is_dir(),
            grpc_handler: delivery_dir.join(DeliveryKind::Grpc.package()).is_dir(),
            graphql_handler: delivery_dir.join(DeliveryKind::GraphQL.package()).is_dir(),
            ..HandlerConfig::default()
        };

        let worker_dir = delivery_dir.join("workerhandler");
        for kind in WorkerKind::ALL {
            *kind.flag_mut(&mut handlers) = worker_dir.join(kind.file_name()).is_file();
        }

        let mut plugins: Vec<String> = walkdir::WalkDir::new(&worker_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let file_name = entry.file_name().to_str()?.to_string();
                file_name
                    .strip_prefix("plugin_")?
                    .strip_suffix("_handler.go")
                    .map(str::to_string)
            })
            .collect();
        plugins.sort();
        handlers.worker_plugins = plugins;

        debug!("Detected handlers in {}: {:?}", module_dir.as_ref().display(), handlers);
        handlers
    }

    /// Recovers the dependency flags wired into an existing service registry
    /// (`internal/service.go`). A missing registry yields no dependencies.
    ///
    /// # Returns
    /// * `Result<HandlerConfig>` - Config with only dependency flags set
    pub fn detect_dependencies<P: AsRef<Path>>(registry: P) -> Result<HandlerConfig> {
        let registry = registry.as_ref();
        if !registry.is_file() {
            return Ok(HandlerConfig::default());
        }
        let source = std::fs::read_to_string(registry)?;
        let handlers = HandlerConfig {
            redis_deps: source.contains("dependency.SetRedisPool("),
            sql_deps: source.contains("dependency.SetSQLDatabase("),
            mongo_deps: source.contains("dependency.SetMongoDatabase("),
            arango_deps: source.contains("dependency.SetArangoDatabase("),
            ..HandlerConfig::default()
        };
        debug!("Detected dependencies in {}: {:?}", registry.display(), handlers);
        Ok(handlers)
    }
}

/// Metadata shared by every template rendered in one run.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigHeader {
    pub go_version: String,
    pub version: String,
    pub header: String,
    pub service_name: String,
    pub package_prefix: String,
    /// Go module path of the service, used as import root
    pub module_path: String,
    pub proto_source: String,
    #[serde(skip)]
    pub output_dir: PathBuf,
    pub owner: String,
    pub license: License,
    pub year: i32,
}

impl ConfigHeader {
    pub fn from_parameters(params: &InvocationParameters) -> Self {
        let version = env!("CARGO_PKG_VERSION").to_string();
        let service_name = clean_path_segment(&params.service_name);
        let module_path = if params.package_prefix.is_empty() {
            service_name.clone()
        } else {
            format!("{}/{}", params.package_prefix.trim_end_matches('/'), service_name)
        };
        let proto_source = if params.proto_output_pkg.is_empty() {
            format!("{module_path}/api/proto")
        } else {
            format!("{}/{}/proto", params.proto_output_pkg.trim_end_matches('/'), service_name)
        };

        Self {
            go_version: params.go_version.clone().unwrap_or_else(detect_go_version),
            header: format!("Code generated by scaffold-maker {version}."),
            version,
            service_name,
            package_prefix: params.package_prefix.clone(),
            module_path,
            proto_source,
            output_dir: params.resolve_output_root(),
            owner: params.owner.clone(),
            license: params.license,
            year: params.year.unwrap_or_else(|| chrono::Local::now().year()),
        }
    }
}

/// Per-module slice of the configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleConfig {
    #[serde(skip)]
    pub header: ConfigHeader,
    #[serde(flatten)]
    pub handlers: HandlerConfig,
    pub module_name: String,
    /// Module already exists on disk and must not be regenerated
    #[serde(skip)]
    pub skip: bool,
}

impl ModuleConfig {
    pub fn new<S: Into<String>>(header: &ConfigHeader, handlers: HandlerConfig, module_name: S) -> Self {
        Self {
            header: header.clone(),
            handlers,
            module_name: module_name.into(),
            skip: false,
        }
    }

    /// Identifiers of the module's active workers in canonical order.
    pub fn worker_activations(&self) -> Vec<&'static str> {
        self.handlers.active_workers().into_iter().map(WorkerKind::identifier).collect()
    }
}

/// Root of every template context; exactly one exists per run.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceConfig {
    #[serde(flatten)]
    pub header: ConfigHeader,
    #[serde(flatten)]
    pub handlers: HandlerConfig,
    pub is_monorepo: bool,
    pub modules: Vec<ModuleConfig>,
    #[serde(skip)]
    pub plugins: IndexMap<String, WorkerPlugin>,
}

impl ServiceConfig {
    /// Builds the service configuration for a run.
    ///
    /// Every module starts from the requested handler set; overrides given
    /// for a module replace its delivery and worker flags. The service-level
    /// flags are the union over all modules.
    ///
    /// # Errors
    /// * `Error::ValidationError` for invalid service, module or plugin names
    /// * `Error::ConfigError` for duplicated modules or missing names
    pub fn from_parameters(params: &InvocationParameters) -> Result<Self> {
        let header = ConfigHeader::from_parameters(params);
        validate_name("service", &header.service_name)?;

        let mut plugins = IndexMap::new();
        for spec in &params.worker_plugins {
            let plugin = WorkerPlugin::parse(spec)?;
            plugins.insert(plugin.name.clone(), plugin);
        }

        let mut defaults = params.handlers.clone();
        for name in plugins.keys() {
            if !defaults.worker_plugins.contains(name) {
                defaults.worker_plugins.push(name.clone());
            }
        }

        let mut handlers = defaults.clone();
        let mut modules: Vec<ModuleConfig> = Vec::new();
        for raw_name in &params.module_names {
            let name = clean_path_segment(raw_name);
            validate_name("module", &name)?;
            if modules.iter().any(|m| m.module_name == name) {
                return Err(Error::ConfigError(format!("module '{name}' is listed twice")));
            }
            let module_handlers = match params.module_overrides.get(raw_name) {
                Some(overrides) => defaults.with_handlers_of(overrides),
                None => defaults.clone(),
            };
            handlers.merge_handlers(&module_handlers);
            modules.push(ModuleConfig::new(&header, module_handlers, name));
        }

        // Plugins named only in module overrides still need an import path.
        for name in &handlers.worker_plugins {
            if !plugins.contains_key(name) {
                plugins.insert(name.clone(), WorkerPlugin::parse(name)?);
            }
        }

        Ok(Self {
            header,
            handlers,
            is_monorepo: params.monorepo,
            modules,
            plugins,
        })
    }

    /// Resets every delivery and worker flag on the service and its modules.
    pub fn disable_all_handlers(&mut self) {
        self.handlers.disable_handlers();
        for module in &mut self.modules {
            module.handlers.disable_handlers();
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Queries the local Go toolchain for its `major.minor` version.
pub fn detect_go_version() -> String {
    Command::new("go")
        .arg("version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| parse_go_version(&String::from_utf8_lossy(&output.stdout)))
        .unwrap_or_else(|| DEFAULT_GO_VERSION.to_string())
}

/// Extracts `major.minor` from `go version` output.
pub fn parse_go_version(output: &str) -> Option<String> {
    let pattern = Regex::new(r"go(\d+\.\d+)").ok()?;
    pattern.captures(output)?.get(1).map(|m| m.as_str().to_string())
}

/// Service description loaded from a JSON or YAML file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceFile {
    pub service: Option<String>,
    pub owner: Option<String>,
    pub license: Option<License>,
    pub package_prefix: Option<String>,
    pub handlers: HandlerConfig,
    pub modules: Vec<ModuleEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ModuleEntry {
    pub name: String,
    #[serde(default)]
    pub handlers: Option<HandlerConfig>,
}

/// Parses a service file, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor YAML
pub fn parse_service_file(content: &str) -> Result<ServiceFile> {
    match serde_json::from_str(content) {
        Ok(file) => Ok(file),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("invalid service file: {e}"))),
    }
}

pub fn load_service_file<P: AsRef<Path>>(path: P) -> Result<ServiceFile> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::ConfigError(format!(
            "service file '{}' does not exist",
            path.display()
        )));
    }
    debug!("Loading service file from {}", path.display());
    parse_service_file(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Scope;

    fn params() -> InvocationParameters {
        InvocationParameters {
            scope: Scope::InitService,
            service_name: "billing-svc".to_string(),
            module_names: vec!["billing".to_string(), "invoice".to_string()],
            go_version: Some("1.22".to_string()),
            year: Some(2024),
            ..InvocationParameters::default()
        }
    }

    #[test]
    fn test_worker_activation_follows_flags() {
        let mut handlers = HandlerConfig::default();
        assert!(!handlers.is_worker_active());

        handlers.rest_handler = true;
        handlers.sql_deps = true;
        assert!(!handlers.is_worker_active());

        for kind in WorkerKind::ALL {
            let mut single = HandlerConfig::default();
            *kind.flag_mut(&mut single) = true;
            assert!(single.is_worker_active(), "{kind:?} should activate workers");
        }

        handlers.worker_plugins.push("nsq".to_string());
        assert!(handlers.is_worker_active());
        handlers.worker_plugins.clear();
        assert!(!handlers.is_worker_active());
    }

    #[test]
    fn test_disable_handlers_is_idempotent() {
        let mut handlers = HandlerConfig {
            rest_handler: true,
            grpc_handler: true,
            fiber_rest_handler: true,
            kafka_handler: true,
            rabbitmq_handler: true,
            redis_deps: true,
            worker_plugins: vec!["nsq".to_string()],
            ..HandlerConfig::default()
        };
        handlers.disable_handlers();
        handlers.disable_handlers();

        assert!(!handlers.is_worker_active());
        assert!(!handlers.is_delivery_active());
        assert!(handlers.active_workers().is_empty());
        assert!(handlers.redis_deps);
    }

    #[test]
    fn test_worker_activations_canonical_order() {
        let header = ConfigHeader::from_parameters(&params());
        let handlers = HandlerConfig {
            rabbitmq_handler: true,
            kafka_handler: true,
            postgres_listener_handler: true,
            scheduler_handler: true,
            ..HandlerConfig::default()
        };
        let module = ModuleConfig::new(&header, handlers, "billing");
        let expected = vec![
            "types.Kafka",
            "types.Scheduler",
            "types.PostgresListener",
            "types.RabbitMQ",
        ];
        assert_eq!(module.worker_activations(), expected);
        assert_eq!(module.worker_activations(), expected);
    }

    #[test]
    fn test_service_from_parameters_applies_overrides() {
        let mut params = params();
        params.handlers.rest_handler = true;
        params.module_overrides.insert(
            "invoice".to_string(),
            HandlerConfig { kafka_handler: true, ..HandlerConfig::default() },
        );

        let service = ServiceConfig::from_parameters(&params).unwrap();
        assert_eq!(service.modules.len(), 2);
        assert!(service.modules[0].handlers.rest_handler);
        assert!(!service.modules[0].handlers.kafka_handler);
        assert!(!service.modules[1].handlers.rest_handler);
        assert!(service.modules[1].handlers.kafka_handler);
        assert!(service.handlers.rest_handler && service.handlers.kafka_handler);
        assert_eq!(service.header.module_path, "billing-svc");
        assert_eq!(service.header.year, 2024);
    }

    #[test]
    fn test_service_rejects_duplicate_modules() {
        let mut params = params();
        params.module_names = vec!["billing".to_string(), "bill*ing".to_string()];
        assert!(matches!(
            ServiceConfig::from_parameters(&params),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_disable_all_handlers_reaches_modules() {
        let mut params = params();
        params.handlers = HandlerConfig {
            rest_handler: true,
            scheduler_handler: true,
            ..HandlerConfig::default()
        };
        params.worker_plugins = vec!["nsq".to_string()];
        let mut service = ServiceConfig::from_parameters(&params).unwrap();
        assert!(service.handlers.is_worker_active());

        service.disable_all_handlers();
        assert!(!service.handlers.is_worker_active());
        assert!(service
            .modules
            .iter()
            .all(|m| !m.handlers.is_worker_active() && !m.handlers.is_delivery_active()));
    }

    #[test]
    fn test_worker_plugin_parse() {
        let plugin = WorkerPlugin::parse("nsq").unwrap();
        assert_eq!(plugin.package_path, format!("{PLUGIN_PACKAGE_PREFIX}/nsq"));
        assert_eq!(plugin.identifier(), "types.Worker(\"nsq\")");

        let plugin = WorkerPlugin::parse("my-queue=example.com/queue").unwrap();
        assert_eq!(plugin.name, "my-queue");
        assert_eq!(plugin.package_path, "example.com/queue");
        assert_eq!(plugin.file_name(), "plugin_my-queue_handler.go");

        assert!(WorkerPlugin::parse("nsq=").is_err());
        assert!(WorkerPlugin::parse("=path").is_err());
    }

    #[test]
    fn test_detect_dependencies_from_registry() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let registry = temp_dir.path().join("service.go");
        assert_eq!(
            HandlerConfig::detect_dependencies(&registry).unwrap(),
            HandlerConfig::default()
        );

        std::fs::write(
            &registry,
            "deps := dependency.InitDependency(\n\tdependency.SetRedisPool(cfg.RedisPool),\n\tdependency.SetSQLDatabase(cfg.SQLDatabase),\n)\n",
        )
        .unwrap();
        let detected = HandlerConfig::detect_dependencies(&registry).unwrap();
        assert!(detected.redis_deps && detected.sql_deps);
        assert!(!detected.mongo_deps && !detected.arango_deps);
        assert!(!detected.is_delivery_active() && !detected.is_worker_active());
    }

    #[test]
    fn test_parse_go_version() {
        assert_eq!(
            parse_go_version("go version go1.22.3 linux/amd64"),
            Some("1.22".to_string())
        );
        assert_eq!(parse_go_version("command not found"), None);
    }

    #[test]
    fn test_parse_service_file_yaml_and_json() {
        let yaml = r#"
service: billing-svc
license: apache
handlers:
  rest_handler: true
modules:
  - name: billing
  - name: invoice
    handlers:
      kafka_handler: true
"#;
        let file = parse_service_file(yaml).unwrap();
        assert_eq!(file.service.as_deref(), Some("billing-svc"));
        assert_eq!(file.license, Some(License::Apache));
        assert!(file.handlers.rest_handler);
        assert_eq!(file.modules.len(), 2);
        assert!(file.modules[1].handlers.as_ref().unwrap().kafka_handler);

        let json = r#"{"service": "svc", "modules": [{"name": "a"}]}"#;
        let file = parse_service_file(json).unwrap();
        assert_eq!(file.modules[0].name, "a");
        assert!(file.modules[0].handlers.is_none());

        assert!(parse_service_file("service: [unclosed").is_err());
    }
}
