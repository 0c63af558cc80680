//! Invocation parameters: the request shape handed to the generator.
//! Holds the requested scope and names, and owns the path rules every
//! downstream component resolves output locations with.

use std::path::PathBuf;

use clap::ValueEnum;
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::{HandlerConfig, License, ServiceFile, SqlDriver};
use crate::constants::{
    MODULES_DIR, MONOREPO_PACKAGE_PREFIX, MONOREPO_PROTO_PACKAGE, MONOREPO_SERVICES_DIR,
};
use crate::error::{default_error_handler, Error, Result};
use crate::naming::clean_path_segment;

/// Mutually exclusive generation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Create a workspace that hosts several services
    InitMonorepo,
    /// Create a new service with its modules
    InitService,
    /// Add modules to an existing service
    AddModule,
    /// Add delivery or worker handlers to an existing module
    AddHandler,
    /// Add a use case to an existing module
    AddUsecase,
    /// Wire an existing use case into the module's delivery handlers
    ApplyUsecase,
}

#[derive(Debug, Clone)]
pub struct InvocationParameters {
    pub scope: Scope,
    pub monorepo: bool,
    pub service_name: String,
    pub module_names: Vec<String>,
    pub usecase_name: Option<String>,
    pub output_dir: PathBuf,
    pub package_prefix: String,
    pub proto_output_pkg: String,
    pub with_go_mod: bool,
    /// Requested handler and dependency set, applied to every module
    pub handlers: HandlerConfig,
    /// Per-module replacement of the delivery and worker set
    pub module_overrides: IndexMap<String, HandlerConfig>,
    /// Worker plugin specs, `name` or `name=import/path`
    pub worker_plugins: Vec<String>,
    pub owner: String,
    pub license: License,
    /// Explicit Go version; the local toolchain is queried when absent
    pub go_version: Option<String>,
    /// Explicit copyright year; the current year is used when absent
    pub year: Option<i32>,
}

impl Default for InvocationParameters {
    fn default() -> Self {
        Self {
            scope: Scope::InitService,
            monorepo: false,
            service_name: String::new(),
            module_names: Vec::new(),
            usecase_name: None,
            output_dir: PathBuf::from("."),
            package_prefix: String::new(),
            proto_output_pkg: String::new(),
            with_go_mod: true,
            handlers: HandlerConfig::default(),
            module_overrides: IndexMap::new(),
            worker_plugins: Vec::new(),
            owner: String::new(),
            license: License::default(),
            go_version: None,
            year: None,
        }
    }
}

impl InvocationParameters {
    /// Switches the parameters to monorepo layout. Services are nested
    /// under `services/` of the output directory; the workspace itself is
    /// created in the output directory.
    ///
    /// # Returns
    /// * `Result<()>` - Ok once the defaults are applied
    ///
    /// # Errors
    /// * `Error::ConfigError` if a service-level scope has no service name
    pub fn apply_monorepo_defaults(&mut self) -> Result<()> {
        self.monorepo = true;
        self.package_prefix = MONOREPO_PACKAGE_PREFIX.to_string();
        self.proto_output_pkg = MONOREPO_PROTO_PACKAGE.to_string();
        if self.scope != Scope::InitMonorepo {
            self.output_dir = self.output_dir.join(MONOREPO_SERVICES_DIR);
        }
        self.with_go_mod = false;

        if matches!(self.scope, Scope::InitService | Scope::AddModule)
            && self.service_name.is_empty()
        {
            return Err(Error::ConfigError(
                "missing service name, make sure to include '--service'".to_string(),
            ));
        }
        Ok(())
    }

    /// Falls back to the name of the service root directory when no service
    /// name was given, so module-level scopes can run from inside a service.
    ///
    /// # Errors
    /// * `Error::ServiceNotFoundError` if the output directory holds no
    ///   service
    pub fn infer_service_name(&mut self) -> Result<()> {
        if !self.service_name.is_empty() {
            return Ok(());
        }
        self.validate_service_exists()?;
        let root = self.output_dir.canonicalize()?;
        match root.file_name().and_then(|name| name.to_str()) {
            Some(name) => {
                debug!("Using '{}' as service name", name);
                self.service_name = name.to_string();
                Ok(())
            }
            None => Err(Error::ConfigError(format!(
                "cannot infer a service name from '{}', make sure to include '--service'",
                root.display()
            ))),
        }
    }

    /// Folds a service file into the parameters. Values given on the
    /// command line win; handler flags are merged.
    pub fn merge_service_file(&mut self, file: ServiceFile) {
        if self.service_name.is_empty() {
            if let Some(service) = file.service {
                self.service_name = service;
            }
        }
        if self.owner.is_empty() {
            if let Some(owner) = file.owner {
                self.owner = owner;
            }
        }
        if let Some(license) = file.license {
            self.license = license;
        }
        if self.package_prefix.is_empty() {
            if let Some(prefix) = file.package_prefix {
                self.package_prefix = prefix;
            }
        }
        self.handlers.merge(&file.handlers);
        if file.handlers.sql_driver != SqlDriver::default() {
            self.handlers.sql_driver = file.handlers.sql_driver;
        }
        for module in file.modules {
            if !self.module_names.contains(&module.name) {
                self.module_names.push(module.name.clone());
            }
            if let Some(handlers) = module.handlers {
                self.module_overrides.insert(module.name, handlers);
            }
        }
    }

    /// Root directory of the service being generated. Monorepo and
    /// init-service runs nest the service under the output directory; every
    /// other run treats the output directory as the service root.
    pub fn resolve_output_root(&self) -> PathBuf {
        if self.monorepo || self.scope == Scope::InitService {
            self.output_dir.join(clean_path_segment(&self.service_name))
        } else {
            self.output_dir.clone()
        }
    }

    pub fn module_dir(&self, module: &str) -> PathBuf {
        self.resolve_output_root().join(MODULES_DIR).join(clean_path_segment(module))
    }

    pub fn usecase_name(&self) -> Result<&str> {
        match self.usecase_name.as_deref() {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(Error::ConfigError(
                "missing use case name, make sure to include '--usecase'".to_string(),
            )),
        }
    }

    /// The single module a module-level scope operates on.
    pub fn target_module(&self) -> Result<&str> {
        match self.module_names.as_slice() {
            [module] => Ok(module),
            [] => Err(Error::ConfigError(
                "missing module name, make sure to include '--module'".to_string(),
            )),
            _ => Err(Error::ConfigError(format!(
                "{:?} works on exactly one module",
                self.scope
            ))),
        }
    }

    /// Checks that the service root holds a module directory.
    ///
    /// # Errors
    /// * `Error::ServiceNotFoundError` if it does not; the caller decides
    ///   how to report it
    pub fn validate_service_exists(&self) -> Result<()> {
        let root = self.resolve_output_root();
        if root.join(MODULES_DIR).is_dir() {
            Ok(())
        } else {
            Err(Error::ServiceNotFoundError {
                service: self.service_name.clone(),
                output_dir: root.display().to_string(),
            })
        }
    }

    pub fn check_module_exists(&self, module: &str) -> Result<()> {
        if self.module_dir(module).is_dir() {
            Ok(())
        } else {
            Err(Error::ModuleNotFoundError {
                module: module.to_string(),
                service: self.service_name.clone(),
            })
        }
    }

    /// Like [`check_module_exists`](Self::check_module_exists), but a
    /// missing module ends the process with status 1.
    pub fn validate_module_exists(&self, module: &str) {
        if let Err(err) = self.check_module_exists(module) {
            default_error_handler(err);
        }
    }

    /// Names of the modules already present in the service, sorted.
    pub fn existing_modules(&self) -> Result<Vec<String>> {
        let modules_dir = self.resolve_output_root().join(MODULES_DIR);
        if !modules_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut modules = Vec::new();
        for entry in WalkDir::new(&modules_dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::IoError(e.into()))?;
            if entry.file_type().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    modules.push(name.to_string());
                }
            }
        }
        debug!("Existing modules in {}: {:?}", modules_dir.display(), modules);
        Ok(modules)
    }
}
