//! Orchestration of one generation run.
//!
//! A run resolves its configuration, composes one file tree per service or
//! module, and writes the trees one after another. A tree is always written
//! completely before the next one starts.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::composer::{
    apply_usecase_tree, module_tree, monorepo_tree, service_tree, usecase_file_name, usecase_tree,
};
use crate::config::{ConfigHeader, HandlerConfig, ModuleConfig, ServiceConfig};
use crate::error::{Error, Result};
use crate::naming::{clean_path_segment, validate_name};
use crate::params::{InvocationParameters, Scope};
use crate::renderer::TemplateRenderer;
use crate::tree::{FileNode, TreeWriter, WriteReport};

/// A composed tree together with the directory it is written below.
#[derive(Debug)]
pub struct Job {
    pub root: PathBuf,
    pub tree: FileNode,
}

impl Job {
    fn new(root: PathBuf, tree: FileNode) -> Self {
        Self { root, tree }
    }
}

pub struct Generator<'a> {
    renderer: &'a dyn TemplateRenderer,
    timeout: Option<Duration>,
}

impl<'a> Generator<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer) -> Self {
        Self {
            renderer,
            timeout: None,
        }
    }

    /// Bounds the run; the deadline is checked before each tree is written.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Executes the requested scope.
    ///
    /// # Returns
    /// * `Result<WriteReport>` - Files written and kept by the run
    ///
    /// # Errors
    /// * Validation and configuration errors before anything is written
    /// * `Error::IoError` as soon as a filesystem operation fails
    /// * `Error::TimeoutError` if the deadline passes between two trees
    /// * `Error::IncompleteGenerationError` if any file failed to render;
    ///   every other file is still written
    pub fn run(&self, params: &InvocationParameters) -> Result<WriteReport> {
        let started = Instant::now();
        let jobs = plan(params)?;
        let writer = TreeWriter::new(self.renderer);

        let mut report = WriteReport::default();
        for job in &jobs {
            if let Some(timeout) = self.timeout {
                if started.elapsed() > timeout {
                    return Err(Error::TimeoutError(timeout));
                }
            }
            debug!("Writing tree below {}", job.root.display());
            report.absorb(writer.write(&job.tree, &job.root)?);
        }

        info!(
            "{} files written, {} skipped in {:?}",
            report.written.len(),
            report.skipped.len(),
            started.elapsed()
        );
        if !report.failed.is_empty() {
            return Err(Error::IncompleteGenerationError {
                failed: report.failed.len(),
            });
        }
        Ok(report)
    }
}

/// Resolves the configuration of a run and composes its trees without
/// touching the filesystem beyond existence checks.
pub fn plan(params: &InvocationParameters) -> Result<Vec<Job>> {
    let mut params = params.clone();
    if !matches!(params.scope, Scope::InitMonorepo | Scope::InitService) && !params.monorepo {
        params.infer_service_name()?;
    }

    match params.scope {
        Scope::InitMonorepo => plan_init_monorepo(&params),
        Scope::InitService => plan_init_service(&params),
        Scope::AddModule => plan_add_module(&params),
        Scope::AddHandler => plan_add_handler(&params),
        Scope::AddUsecase => plan_add_usecase(&params),
        Scope::ApplyUsecase => plan_apply_usecase(&params),
    }
}

fn plan_init_monorepo(params: &InvocationParameters) -> Result<Vec<Job>> {
    let header = ConfigHeader::from_parameters(params);
    Ok(vec![Job::new(params.output_dir.clone(), monorepo_tree(&header)?)])
}

fn plan_init_service(params: &InvocationParameters) -> Result<Vec<Job>> {
    let service = ServiceConfig::from_parameters(params)?;
    let root = params.resolve_output_root();
    let names: Vec<String> = service.modules.iter().map(|m| m.module_name.clone()).collect();

    let mut jobs = vec![Job::new(
        root.clone(),
        service_tree(&service, &names, false, params.with_go_mod)?,
    )];
    for module in &service.modules {
        jobs.push(Job::new(root.clone(), module_tree(&service, module)?));
    }
    Ok(jobs)
}

fn plan_add_module(params: &InvocationParameters) -> Result<Vec<Job>> {
    params.validate_service_exists()?;
    let mut service = ServiceConfig::from_parameters(params)?;
    let root = params.resolve_output_root();
    let wired = HandlerConfig::detect_dependencies(root.join("internal").join("service.go"))?;
    service.handlers.merge(&wired);
    for module in &mut service.modules {
        module.handlers.merge(&wired);
    }

    let mut names = params.existing_modules()?;
    for module in &mut service.modules {
        if names.contains(&module.module_name) {
            warn!("Module '{}' already exists, skipping", module.module_name);
            module.skip = true;
        } else {
            names.push(module.module_name.clone());
        }
    }

    let mut jobs = vec![Job::new(
        root.clone(),
        service_tree(&service, &names, true, params.with_go_mod)?,
    )];
    for module in &service.modules {
        jobs.push(Job::new(root.clone(), module_tree(&service, module)?));
    }
    Ok(jobs)
}

/// Service configuration narrowed to the single module a module-level scope
/// works on, carrying the handler set found on disk.
fn existing_module(params: &InvocationParameters) -> Result<(ServiceConfig, ModuleConfig)> {
    params.validate_service_exists()?;
    let module_name = clean_path_segment(params.target_module()?);
    params.validate_module_exists(&module_name);

    let mut service = ServiceConfig::from_parameters(params)?;
    let mut module = match service.modules.pop() {
        Some(module) => module,
        None => {
            return Err(Error::ConfigError(format!(
                "module '{module_name}' is not part of the configuration"
            )))
        }
    };
    let detected = HandlerConfig::detect(params.module_dir(&module_name));
    module.handlers = module.handlers.with_handlers_of(&detected);
    service.handlers = service.handlers.with_handlers_of(&detected);
    service.modules.push(module.clone());
    Ok((service, module))
}

fn plan_add_handler(params: &InvocationParameters) -> Result<Vec<Job>> {
    params.target_module()?;
    let requested = ServiceConfig::from_parameters(params)?
        .modules
        .pop()
        .map(|m| m.handlers)
        .unwrap_or_default();
    if !requested.is_delivery_active() && !requested.is_worker_active() {
        return Err(Error::ConfigError(
            "no handler selected, pass at least one handler flag".to_string(),
        ));
    }

    let (mut service, mut module) = existing_module(params)?;
    service.disable_all_handlers();
    module.handlers.merge_handlers(&requested);
    service.handlers.merge_handlers(&module.handlers);
    service.modules = vec![module.clone()];
    debug!("Handlers of module '{}' after merge: {:?}", module.module_name, module.handlers);

    Ok(vec![Job::new(params.resolve_output_root(), module_tree(&service, &module)?)])
}

fn plan_add_usecase(params: &InvocationParameters) -> Result<Vec<Job>> {
    let usecase = params.usecase_name()?;
    validate_name("use case", usecase)?;
    let (service, module) = existing_module(params)?;
    Ok(vec![Job::new(
        params.resolve_output_root(),
        usecase_tree(&service, &module, usecase)?,
    )])
}

fn plan_apply_usecase(params: &InvocationParameters) -> Result<Vec<Job>> {
    let usecase = params.usecase_name()?;
    validate_name("use case", usecase)?;
    let (service, module) = existing_module(params)?;

    let usecase_file = params
        .module_dir(&module.module_name)
        .join("usecase")
        .join(usecase_file_name(usecase));
    if !usecase_file.is_file() {
        return Err(Error::ConfigError(format!(
            "use case '{}' not found at {}, run add-usecase first",
            usecase,
            usecase_file.display()
        )));
    }
    if !module.handlers.is_delivery_active() {
        return Err(Error::ConfigError(format!(
            "module '{}' has no delivery handler to apply '{}' to",
            module.module_name, usecase
        )));
    }

    Ok(vec![Job::new(
        params.resolve_output_root(),
        apply_usecase_tree(&service, &module, usecase)?,
    )])
}

/// Resolved configuration of a run as pretty JSON.
pub fn describe(params: &InvocationParameters) -> Result<String> {
    ServiceConfig::from_parameters(params)?.to_json_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MODULES_DIR;
    use tempfile::TempDir;

    fn params(scope: Scope, output: &TempDir) -> InvocationParameters {
        InvocationParameters {
            scope,
            service_name: "shop".to_string(),
            module_names: vec!["billing".to_string()],
            output_dir: output.path().to_path_buf(),
            go_version: Some("1.22".to_string()),
            year: Some(2024),
            ..InvocationParameters::default()
        }
    }

    #[test]
    fn test_plan_init_service_has_one_tree_per_module() {
        let temp_dir = TempDir::new().unwrap();
        let mut params = params(Scope::InitService, &temp_dir);
        params.module_names.push("invoice".to_string());

        let jobs = plan(&params).unwrap();
        assert_eq!(jobs.len(), 3);
        assert!(jobs.iter().all(|job| job.root == temp_dir.path().join("shop")));
    }

    #[test]
    fn test_plan_add_module_requires_service() {
        let temp_dir = TempDir::new().unwrap();
        let params = params(Scope::AddModule, &temp_dir);
        assert!(matches!(
            plan(&params),
            Err(Error::ServiceNotFoundError { .. })
        ));
    }

    #[test]
    fn test_plan_add_module_skips_existing_modules() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join(MODULES_DIR).join("billing")).unwrap();

        let mut params = params(Scope::AddModule, &temp_dir);
        params.module_names.push("invoice".to_string());
        let jobs = plan(&params).unwrap();

        assert!(jobs[1].tree.skip_all);
        assert!(!jobs[2].tree.skip_all);
        assert!(jobs[0].tree.find("cmd/shop/main.go").unwrap().skip);
    }

    #[test]
    fn test_plan_add_handler_requires_a_handler() {
        let temp_dir = TempDir::new().unwrap();
        let params = params(Scope::AddHandler, &temp_dir);
        assert!(matches!(plan(&params), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_plan_apply_usecase_requires_usecase_file() {
        let temp_dir = TempDir::new().unwrap();
        let module_dir = temp_dir.path().join(MODULES_DIR).join("billing");
        std::fs::create_dir_all(module_dir.join("delivery/resthandler")).unwrap();

        let mut params = params(Scope::ApplyUsecase, &temp_dir);
        params.usecase_name = Some("create_invoice".to_string());
        assert!(matches!(plan(&params), Err(Error::ConfigError(_))));

        std::fs::create_dir_all(module_dir.join("usecase")).unwrap();
        std::fs::write(module_dir.join("usecase/create_invoice.go"), "package usecase\n").unwrap();
        let jobs = plan(&params).unwrap();
        assert!(jobs[0]
            .tree
            .find("internal/modules/billing/delivery/resthandler/create_invoice.go")
            .is_some());
    }

    #[test]
    fn test_describe_outputs_json() {
        let temp_dir = TempDir::new().unwrap();
        let json = describe(&params(Scope::InitService, &temp_dir)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["service_name"], "shop");
        assert_eq!(value["modules"][0]["module_name"], "billing");
    }
}
