//! Composition of file trees and template data for each generation scope.
//!
//! Every tree returned here is rooted at the service root (or the monorepo
//! root for [`monorepo_tree`]) and is assembled bottom-up from literals.
//! Inactive handlers are left out of the tree entirely.

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::config::{
    ConfigHeader, DeliveryKind, ModuleConfig, ServiceConfig, WorkerKind, WorkerPlugin,
};
use crate::constants::{FRAMEWORK_PACKAGE, MODULES_DIR};
use crate::error::{Error, Result};
use crate::naming::{clean_path_segment, to_pascal, to_snake};
use crate::templates::{
    ENV_SAMPLE, GITIGNORE, GRAPHQL_HANDLER, GRAPHQL_SCHEMA, GRPC_HANDLER, MODULE_MAIN,
    MODULE_REPOSITORY, MODULE_USECASE, MONOREPO_GO_WORK, MONOREPO_README, PLUGIN_HANDLER,
    PROTO_SCHEMA, REST_HANDLER, SERVICE_GO_MOD, SERVICE_MAIN, SERVICE_README, SERVICE_REGISTRY,
    USECASE_DELIVERY, USECASE_ITEM, WORKER_HANDLER,
};
use crate::tree::FileNode;

fn object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::ConfigError(format!(
            "template data must be an object, got {other}"
        ))),
    }
}

fn with_entry(context: &Value, key: &str, value: Value) -> Result<Value> {
    let mut map = object(context.clone())?;
    map.insert(key.to_string(), value);
    Ok(Value::Object(map))
}

fn worker_entry(kind: WorkerKind) -> Value {
    let constructor = kind.constructor();
    json!({
        "identifier": kind.identifier(),
        "constructor": constructor,
        "struct_name": constructor.trim_start_matches("New"),
        "file_name": kind.file_name(),
    })
}

fn plugin_entry(plugin: &WorkerPlugin) -> Value {
    let struct_name = format!("{}Handler", to_pascal(&plugin.name));
    json!({
        "name": plugin.name,
        "package_path": plugin.package_path,
        "identifier": plugin.identifier(),
        "constructor": format!("New{struct_name}"),
        "struct_name": struct_name,
        "file_name": plugin.file_name(),
    })
}

/// Resolves a plugin by name; plugins detected on disk without a known
/// import path fall back to the default plugin location.
fn resolve_plugin(service: &ServiceConfig, name: &str) -> Result<WorkerPlugin> {
    match service.plugins.get(name) {
        Some(plugin) => Ok(plugin.clone()),
        None => WorkerPlugin::parse(name),
    }
}

/// Service-wide template data.
///
/// # Arguments
/// * `service` - Configuration of the run
/// * `module_names` - Every module registered in the service, existing
///   ones included
///
/// # Returns
/// * `Result<Value>` - JSON object handed to the service templates
pub fn service_context(service: &ServiceConfig, module_names: &[String]) -> Result<Value> {
    let mut map = object(serde_json::to_value(service)?)?;
    let driver = service.handlers.sql_driver;
    let plugins = service.plugins.values().map(plugin_entry).collect::<Vec<_>>();

    map.insert("framework".to_string(), json!(FRAMEWORK_PACKAGE));
    map.insert("is_worker_active".to_string(), json!(service.handlers.is_worker_active()));
    map.insert("sql_driver_package".to_string(), json!(driver.driver_package()));
    map.insert("gorm_package".to_string(), json!(driver.gorm_package()));
    map.insert("module_names".to_string(), json!(module_names));
    map.insert("plugins".to_string(), Value::Array(plugins));
    Ok(Value::Object(map))
}

/// Template data for one module: the service context with the module's own
/// flags layered on top.
pub fn module_context(service: &ServiceConfig, module: &ModuleConfig) -> Result<Value> {
    let names: Vec<String> = service.modules.iter().map(|m| m.module_name.clone()).collect();
    let mut map = object(service_context(service, &names)?)?;
    map.extend(object(serde_json::to_value(&module.handlers)?)?);

    let handlers = &module.handlers;
    let workers = handlers.active_workers().into_iter().map(worker_entry).collect::<Vec<_>>();
    let mut plugins = Vec::new();
    for name in &handlers.worker_plugins {
        plugins.push(plugin_entry(&resolve_plugin(service, name)?));
    }

    map.insert("module".to_string(), json!(clean_path_segment(&module.module_name)));
    map.insert("is_worker_active".to_string(), json!(handlers.is_worker_active()));
    map.insert("workers".to_string(), Value::Array(workers));
    map.insert("module_plugins".to_string(), Value::Array(plugins));
    map.insert(
        "sql_driver_package".to_string(),
        json!(handlers.sql_driver.driver_package()),
    );
    map.insert("gorm_package".to_string(), json!(handlers.sql_driver.gorm_package()));
    Ok(Value::Object(map))
}

/// Workspace hosting several services.
pub fn monorepo_tree(header: &ConfigHeader) -> Result<FileNode> {
    let context = serde_json::to_value(header)?;
    Ok(FileNode::dir("")
        .child(FileNode::template("README.md", MONOREPO_README, context.clone()).skip_if_exist())
        .child(FileNode::template("go.work", MONOREPO_GO_WORK, context).skip_if_exist())
        .child(FileNode::literal(".gitignore", GITIGNORE).skip_if_exist())
        .child(FileNode::dir("sdk").child(FileNode::package_stub("sdk.go").skip_if_exist()))
        .child(FileNode::dir("services")))
}

/// Service-level files outside the module directories.
///
/// # Arguments
/// * `existing` - The service is already on disk; only the module registry
///   is rewritten
/// * `with_go_mod` - Whether the service gets its own go.mod
pub fn service_tree(
    service: &ServiceConfig,
    module_names: &[String],
    existing: bool,
    with_go_mod: bool,
) -> Result<FileNode> {
    let context = service_context(service, module_names)?;
    let service_dir = clean_path_segment(&service.header.service_name);
    let license = service.header.license.template_name();

    Ok(FileNode::dir("")
        .child(
            FileNode::dir("cmd").child(
                FileNode::dir(service_dir)
                    .child(FileNode::template("main.go", SERVICE_MAIN, context.clone()).skip(existing)),
            ),
        )
        .child(
            FileNode::dir("internal")
                .child(FileNode::template("service.go", SERVICE_REGISTRY, context.clone()))
                .child(FileNode::dir("modules")),
        )
        .child(
            FileNode::dir("pkg")
                .child(FileNode::dir("shared").child(FileNode::package_stub("shared.go").skip_if_exist())),
        )
        .child(FileNode::literal(".env.sample", ENV_SAMPLE).skip(existing))
        .child(FileNode::literal(".gitignore", GITIGNORE).skip_if_exist())
        .child(FileNode::template("LICENSE", license, context.clone()).skip(existing))
        .child(FileNode::template("README.md", SERVICE_README, context.clone()).skip(existing))
        .child_if(with_go_mod, || {
            FileNode::template("go.mod", SERVICE_GO_MOD, context.clone()).skip(existing)
        }))
}

fn delivery_package(kind: DeliveryKind, template: &str, context: &Value) -> FileNode {
    let package = kind.package();
    FileNode::dir(package)
        .child(FileNode::template(format!("{package}.go"), template, context.clone()).skip_if_exist())
}

/// One module: its root file, the packages of every active handler, and
/// the API schemas of its GRPC and GraphQL handlers.
///
/// The module root file is always rewritten so it wires exactly the active
/// handlers; every other file is kept if it already exists. A module marked
/// `skip` yields a tree that writes nothing.
pub fn module_tree(service: &ServiceConfig, module: &ModuleConfig) -> Result<FileNode> {
    let context = module_context(service, module)?;
    let handlers = &module.handlers;
    let name = clean_path_segment(&module.module_name);

    let mut workers = FileNode::dir("workerhandler");
    for kind in handlers.active_workers() {
        let data = with_entry(&context, "worker", worker_entry(kind))?;
        workers = workers.child(FileNode::template(kind.file_name(), WORKER_HANDLER, data).skip_if_exist());
    }
    for plugin_name in &handlers.worker_plugins {
        let plugin = resolve_plugin(service, plugin_name)?;
        let data = with_entry(&context, "plugin", plugin_entry(&plugin))?;
        workers = workers.child(FileNode::template(plugin.file_name(), PLUGIN_HANDLER, data).skip_if_exist());
    }

    let delivery = FileNode::dir("delivery")
        .child_if(DeliveryKind::Rest.is_enabled(handlers), || {
            delivery_package(DeliveryKind::Rest, REST_HANDLER, &context)
        })
        .child_if(DeliveryKind::Grpc.is_enabled(handlers), || {
            delivery_package(DeliveryKind::Grpc, GRPC_HANDLER, &context)
        })
        .child_if(DeliveryKind::GraphQL.is_enabled(handlers), || {
            delivery_package(DeliveryKind::GraphQL, GRAPHQL_HANDLER, &context)
        })
        .child_if(handlers.is_worker_active(), || workers);

    let module_dir = FileNode::dir(Path::new(MODULES_DIR).join(&name))
        .child(FileNode::template("module.go", MODULE_MAIN, context.clone()))
        .child(delivery)
        .child(FileNode::dir("domain").child(FileNode::package_stub("domain.go").skip_if_exist()))
        .child(
            FileNode::dir("usecase")
                .child(FileNode::template("usecase.go", MODULE_USECASE, context.clone()).skip_if_exist()),
        )
        .child(
            FileNode::dir("repository").child(
                FileNode::template("repository.go", MODULE_REPOSITORY, context.clone()).skip_if_exist(),
            ),
        );

    Ok(FileNode::dir("")
        .child(module_dir)
        .child_if(handlers.grpc_handler, || {
            FileNode::dir(Path::new("api/proto").join(&name)).child(
                FileNode::template(format!("{name}.proto"), PROTO_SCHEMA, context.clone()).skip_if_exist(),
            )
        })
        .child_if(handlers.graphql_handler, || {
            FileNode::dir("api/graphql").child(
                FileNode::template(format!("{name}.graphql"), GRAPHQL_SCHEMA, context.clone()).skip_if_exist(),
            )
        })
        .skip_all(module.skip))
}

/// File name of a use case inside the module's `usecase` package.
pub fn usecase_file_name(usecase: &str) -> String {
    format!("{}.go", to_snake(usecase))
}

/// New use case file in an existing module.
pub fn usecase_tree(service: &ServiceConfig, module: &ModuleConfig, usecase: &str) -> Result<FileNode> {
    let context = with_entry(&module_context(service, module)?, "usecase", json!(usecase))?;
    let name = clean_path_segment(&module.module_name);
    Ok(FileNode::dir(Path::new(MODULES_DIR).join(name).join("usecase")).child(
        FileNode::template(usecase_file_name(usecase), USECASE_ITEM, context).skip_if_exist(),
    ))
}

/// Entry points forwarding each active delivery handler of the module to an
/// existing use case.
pub fn apply_usecase_tree(
    service: &ServiceConfig,
    module: &ModuleConfig,
    usecase: &str,
) -> Result<FileNode> {
    let context = with_entry(&module_context(service, module)?, "usecase", json!(usecase))?;
    let name = clean_path_segment(&module.module_name);
    let mut delivery = FileNode::dir(Path::new(MODULES_DIR).join(name).join("delivery"));
    for kind in module.handlers.active_deliveries() {
        let data = with_entry(&context, "delivery", json!(kind.package()))?;
        delivery = delivery.child(
            FileNode::dir(kind.package())
                .child(FileNode::template(usecase_file_name(usecase), USECASE_DELIVERY, data).skip_if_exist()),
        );
    }
    Ok(delivery)
}
