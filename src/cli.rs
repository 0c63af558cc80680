//! Command-line interface of scaffold-maker.
//! Parses arguments with clap and folds them, together with an optional
//! service file, into [`InvocationParameters`].

use std::path::PathBuf;

use clap::{error::ErrorKind, CommandFactory, Parser};

use crate::config::{load_service_file, Dependency, HandlerConfig, License, SqlDriver};
use crate::error::Result;
use crate::params::{InvocationParameters, Scope};

/// Command-line arguments structure for scaffold-maker.
#[derive(Parser, Debug)]
#[command(author, version, about = "scaffold-maker: skeleton generator for modular Go services", long_about = None)]
pub struct Args {
    /// Operation to perform
    #[arg(value_enum, value_name = "SCOPE")]
    pub scope: Scope,

    /// Name of the service
    #[arg(short, long)]
    pub service: Option<String>,

    /// Module to create or work on, repeat for several modules
    #[arg(short, long = "module", value_name = "NAME")]
    pub modules: Vec<String>,

    /// Use case for add-usecase and apply-usecase
    #[arg(short, long)]
    pub usecase: Option<String>,

    /// Directory the service (or monorepo) is generated in
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Import prefix of the generated Go module
    #[arg(long)]
    pub package_prefix: Option<String>,

    /// Package the generated protobuf stubs are placed in
    #[arg(long)]
    pub proto_output_pkg: Option<String>,

    /// Generate the service inside a monorepo created with init-monorepo
    #[arg(long)]
    pub monorepo: bool,

    /// Do not write a go.mod for the service
    #[arg(long)]
    pub no_go_mod: bool,

    /// REST delivery handler
    #[arg(long)]
    pub rest: bool,

    /// REST delivery handler served by fiber
    #[arg(long)]
    pub fiber_rest: bool,

    /// GRPC delivery handler
    #[arg(long)]
    pub grpc: bool,

    /// GraphQL delivery handler
    #[arg(long)]
    pub graphql: bool,

    /// Kafka consumer worker
    #[arg(long)]
    pub kafka: bool,

    /// Cron scheduler worker
    #[arg(long)]
    pub scheduler: bool,

    /// Redis subscriber worker
    #[arg(long)]
    pub redis_subscriber: bool,

    /// Task queue worker
    #[arg(long)]
    pub task_queue: bool,

    /// Postgres event listener worker
    #[arg(long)]
    pub postgres_listener: bool,

    /// RabbitMQ consumer worker
    #[arg(long)]
    pub rabbitmq: bool,

    /// Worker plugin as `name` or `name=import/path`
    #[arg(long = "worker-plugin", value_name = "NAME[=PATH]")]
    pub worker_plugins: Vec<String>,

    /// Datastore dependencies, comma separated
    #[arg(long = "deps", value_enum, value_delimiter = ',')]
    pub dependencies: Vec<Dependency>,

    /// SQL driver used with the sql dependency
    #[arg(long, value_enum)]
    pub sql_driver: Option<SqlDriver>,

    /// Access SQL through GORM
    #[arg(long)]
    pub gorm: bool,

    /// License written to the service root
    #[arg(long, value_enum)]
    pub license: Option<License>,

    /// Copyright owner named in the license
    #[arg(long)]
    pub owner: Option<String>,

    /// Service file (JSON or YAML) with defaults for this run
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the resolved configuration instead of generating
    #[arg(long)]
    pub print_config: bool,

    /// Abort if the run takes longer than this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Handler flags requested on the command line.
    pub fn requested_handlers(&self) -> HandlerConfig {
        let mut handlers = HandlerConfig {
            rest_handler: self.rest,
            fiber_rest_handler: self.fiber_rest,
            grpc_handler: self.grpc,
            graphql_handler: self.graphql,
            kafka_handler: self.kafka,
            scheduler_handler: self.scheduler,
            redis_subs_handler: self.redis_subscriber,
            task_queue_handler: self.task_queue,
            postgres_listener_handler: self.postgres_listener,
            rabbitmq_handler: self.rabbitmq,
            sql_use_gorm: self.gorm,
            ..HandlerConfig::default()
        };
        for dependency in &self.dependencies {
            handlers.enable_dependency(*dependency);
        }
        handlers
    }

    /// Builds the parameters of the run. A service file is read first;
    /// anything given on the command line takes precedence over it.
    ///
    /// # Errors
    /// * `Error::IoError` or `Error::ConfigError` if the service file cannot
    ///   be read or parsed
    /// * `Error::ConfigError` for a monorepo run without service name
    ///
    /// # Returns
    /// * `Result<InvocationParameters>` - Parameters of the run
    pub fn into_parameters(self) -> Result<InvocationParameters> {
        let mut params = InvocationParameters {
            scope: self.scope,
            output_dir: self.output.clone(),
            with_go_mod: !self.no_go_mod,
            ..InvocationParameters::default()
        };
        if let Some(path) = &self.config {
            params.merge_service_file(load_service_file(path)?);
        }

        let requested = self.requested_handlers();
        params.handlers.merge(&requested);
        if let Some(driver) = self.sql_driver {
            params.handlers.sql_driver = driver;
        }
        if let Some(service) = self.service {
            params.service_name = service;
        }
        for module in self.modules {
            if !params.module_names.contains(&module) {
                params.module_names.push(module);
            }
        }
        params.usecase_name = self.usecase;
        params.worker_plugins.extend(self.worker_plugins);
        if let Some(owner) = self.owner {
            params.owner = owner;
        }
        if let Some(license) = self.license {
            params.license = license;
        }

        if self.monorepo {
            params.apply_monorepo_defaults()?;
        }
        if let Some(prefix) = self.package_prefix {
            params.package_prefix = prefix;
        }
        if let Some(proto) = self.proto_output_pkg {
            params.proto_output_pkg = proto;
        }
        Ok(params)
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_repeated_modules_and_deps() {
        let args = Args::try_parse_from([
            "scaffold-maker",
            "init-service",
            "--service",
            "shop",
            "-m",
            "billing",
            "-m",
            "invoice",
            "--rest",
            "--kafka",
            "--deps",
            "redis,sql",
        ])
        .unwrap();
        assert_eq!(args.scope, Scope::InitService);

        let params = args.into_parameters().unwrap();
        assert_eq!(params.module_names, vec!["billing", "invoice"]);
        assert!(params.handlers.rest_handler && params.handlers.kafka_handler);
        assert!(params.handlers.redis_deps && params.handlers.sql_deps);
        assert!(!params.handlers.grpc_handler);
    }

    #[test]
    fn test_monorepo_flag() {
        let args =
            Args::try_parse_from(["scaffold-maker", "add-module", "--monorepo", "-s", "shop", "-m", "cart"])
                .unwrap();
        let params = args.into_parameters().unwrap();
        assert!(params.monorepo);
        assert!(!params.with_go_mod);

        let args = Args::try_parse_from(["scaffold-maker", "add-module", "--monorepo", "-m", "cart"]).unwrap();
        assert!(args.into_parameters().is_err());
    }

    #[test]
    fn test_unknown_scope_is_rejected() {
        assert!(Args::try_parse_from(["scaffold-maker", "init-everything"]).is_err());
    }
}
