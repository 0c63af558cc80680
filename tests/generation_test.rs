use std::fs;
use std::path::Path;
use std::time::Duration;

use scaffold_maker::config::HandlerConfig;
use scaffold_maker::error::Error;
use scaffold_maker::generator::Generator;
use scaffold_maker::params::{InvocationParameters, Scope};
use scaffold_maker::renderer::MiniJinjaRenderer;
use tempfile::TempDir;

fn params(scope: Scope, output: &Path) -> InvocationParameters {
    InvocationParameters {
        scope,
        service_name: "shop".to_string(),
        module_names: vec!["billing".to_string()],
        output_dir: output.to_path_buf(),
        owner: "Jane Doe".to_string(),
        go_version: Some("1.22".to_string()),
        year: Some(2024),
        ..InvocationParameters::default()
    }
}

fn generate(params: &InvocationParameters) -> scaffold_maker::error::Result<()> {
    let renderer = MiniJinjaRenderer::new()?;
    Generator::new(&renderer).run(params).map(|_| ())
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

fn rest_and_kafka() -> HandlerConfig {
    HandlerConfig {
        rest_handler: true,
        kafka_handler: true,
        ..HandlerConfig::default()
    }
}

#[test]
fn test_init_service_with_rest_and_kafka() {
    let temp_dir = TempDir::new().unwrap();
    let mut params = params(Scope::InitService, temp_dir.path());
    params.handlers = rest_and_kafka();
    generate(&params).unwrap();

    let root = temp_dir.path().join("shop");
    for file in [
        "cmd/shop/main.go",
        ".env.sample",
        ".gitignore",
        "LICENSE",
        "README.md",
        "go.mod",
        "internal/service.go",
        "pkg/shared/shared.go",
        "internal/modules/billing/module.go",
        "internal/modules/billing/delivery/resthandler/resthandler.go",
        "internal/modules/billing/delivery/workerhandler/kafka_handler.go",
        "internal/modules/billing/domain/domain.go",
        "internal/modules/billing/usecase/usecase.go",
        "internal/modules/billing/repository/repository.go",
    ] {
        assert!(root.join(file).is_file(), "missing {file}");
    }
    for absent in [
        "internal/modules/billing/delivery/grpchandler",
        "internal/modules/billing/delivery/graphqlhandler",
        "internal/modules/billing/delivery/workerhandler/cron_handler.go",
        "api",
    ] {
        assert!(!root.join(absent).exists(), "unexpected {absent}");
    }

    let module = read(root.join("internal/modules/billing/module.go"));
    assert!(module.contains("package billing"));
    assert!(module.contains(r#"moduleName types.Module = "BILLING""#));
    assert!(module.contains("mod.restHandler = resthandler.NewRestHandler("));
    assert!(module.contains("types.Kafka: workerhandler.NewKafkaHandler(),"));
    assert!(!module.contains("grpchandler"));
    assert!(!module.contains("types.Scheduler"));
    assert!(module.contains("func (m *Module) WorkerHandler(workerType types.Worker)"));

    assert_eq!(read(root.join("go.mod")), "module shop\n\ngo 1.22\n");
    assert_eq!(read(root.join("pkg/shared/shared.go")), "package shared\n");
    assert!(read(root.join("LICENSE")).contains("Copyright (c) 2024 Jane Doe"));
    assert!(read(root.join("internal/service.go")).contains("billing.NewModule(deps),"));
}

#[test]
fn test_init_service_without_go_mod_and_with_grpc() {
    let temp_dir = TempDir::new().unwrap();
    let mut params = params(Scope::InitService, temp_dir.path());
    params.with_go_mod = false;
    params.handlers.grpc_handler = true;
    params.handlers.graphql_handler = true;
    generate(&params).unwrap();

    let root = temp_dir.path().join("shop");
    assert!(!root.join("go.mod").exists());
    assert!(read(root.join("api/proto/billing/billing.proto")).contains("service BillingHandler"));
    assert!(root.join("api/graphql/billing.graphql").is_file());
    assert!(!root.join("internal/modules/billing/delivery/workerhandler").exists());
}

#[test]
fn test_generation_is_deterministic() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    for dir in [&first, &second] {
        let mut params = params(Scope::InitService, dir.path());
        params.module_names.push("invoice".to_string());
        params.handlers = rest_and_kafka();
        params.handlers.sql_deps = true;
        params.worker_plugins = vec!["outbox".to_string()];
        generate(&params).unwrap();
    }
    assert!(!dir_diff::is_different(first.path(), second.path()).unwrap());
}

#[test]
fn test_worker_plugin_is_wired() {
    let temp_dir = TempDir::new().unwrap();
    let mut params = params(Scope::InitService, temp_dir.path());
    params.worker_plugins = vec!["outbox=example.com/plugins/outbox".to_string()];
    generate(&params).unwrap();

    let module_dir = temp_dir.path().join("shop/internal/modules/billing");
    let plugin = read(module_dir.join("delivery/workerhandler/plugin_outbox_handler.go"));
    assert!(plugin.contains(r#"_ "example.com/plugins/outbox""#));
    assert!(read(module_dir.join("module.go"))
        .contains(r#"types.Worker("outbox"): workerhandler.NewOutboxHandler(),"#));
}

#[test]
fn test_add_module_keeps_existing_modules() {
    let temp_dir = TempDir::new().unwrap();
    let mut init = params(Scope::InitService, temp_dir.path());
    init.handlers.redis_deps = true;
    init.handlers.sql_deps = true;
    generate(&init).unwrap();

    let root = temp_dir.path().join("shop");
    let billing = root.join("internal/modules/billing/module.go");
    fs::write(&billing, "package billing // edited\n").unwrap();

    let mut params = params(Scope::AddModule, &root);
    params.module_names = vec!["billing".to_string(), "invoice".to_string()];
    params.handlers.rest_handler = true;
    generate(&params).unwrap();

    assert_eq!(read(&billing), "package billing // edited\n");
    assert!(root.join("internal/modules/invoice/delivery/resthandler/resthandler.go").is_file());
    let registry = read(root.join("internal/service.go"));
    assert!(registry.contains("billing.NewModule(deps),"));
    assert!(registry.contains("invoice.NewModule(deps),"));
    assert!(registry.contains("dependency.SetRedisPool(cfg.RedisPool),"));
    assert!(registry.contains("dependency.SetSQLDatabase(cfg.SQLDatabase),"));
    assert!(!registry.contains("dependency.SetMongoDatabase("));
}

#[test]
fn test_add_module_without_service_dir() {
    let temp_dir = TempDir::new().unwrap();
    let mut params = params(Scope::AddModule, &temp_dir.path().join("missing"));
    params.service_name.clear();
    assert!(matches!(generate(&params), Err(Error::ServiceNotFoundError { .. })));
}

#[test]
fn test_add_module_requires_existing_service() {
    let temp_dir = TempDir::new().unwrap();
    let params = params(Scope::AddModule, temp_dir.path());
    assert!(matches!(generate(&params), Err(Error::ServiceNotFoundError { .. })));
}

#[test]
fn test_add_handler_keeps_existing_handlers() {
    let temp_dir = TempDir::new().unwrap();
    let mut init = params(Scope::InitService, temp_dir.path());
    init.handlers = rest_and_kafka();
    generate(&init).unwrap();

    let root = temp_dir.path().join("shop");
    let module_dir = root.join("internal/modules/billing");
    let rest = module_dir.join("delivery/resthandler/resthandler.go");
    fs::write(&rest, "package resthandler // edited\n").unwrap();

    let mut params = params(Scope::AddHandler, &root);
    params.handlers.grpc_handler = true;
    params.handlers.scheduler_handler = true;
    generate(&params).unwrap();

    assert_eq!(read(&rest), "package resthandler // edited\n");
    assert!(module_dir.join("delivery/grpchandler/grpchandler.go").is_file());
    assert!(module_dir.join("delivery/workerhandler/cron_handler.go").is_file());
    assert!(root.join("api/proto/billing/billing.proto").is_file());

    let module = read(module_dir.join("module.go"));
    assert!(module.contains("resthandler.NewRestHandler("));
    assert!(module.contains("grpchandler.NewGRPCHandler("));
    assert!(module.contains("types.Kafka: workerhandler.NewKafkaHandler(),"));
    assert!(module.contains("types.Scheduler: workerhandler.NewCronHandler(),"));
}

#[test]
fn test_usecase_then_apply() {
    let temp_dir = TempDir::new().unwrap();
    let mut init = params(Scope::InitService, temp_dir.path());
    init.handlers.rest_handler = true;
    generate(&init).unwrap();
    let root = temp_dir.path().join("shop");
    let module_dir = root.join("internal/modules/billing");

    let mut apply = params(Scope::ApplyUsecase, &root);
    apply.usecase_name = Some("create_invoice".to_string());
    assert!(matches!(generate(&apply), Err(Error::ConfigError(_))));

    let mut add = params(Scope::AddUsecase, &root);
    add.usecase_name = Some("create_invoice".to_string());
    generate(&add).unwrap();
    let usecase = read(module_dir.join("usecase/create_invoice.go"));
    assert!(usecase.contains("func CreateInvoice(ctx context.Context, req CreateInvoiceRequest)"));

    generate(&apply).unwrap();
    let delivery = read(module_dir.join("delivery/resthandler/create_invoice.go"));
    assert!(delivery.contains("package resthandler"));
    assert!(delivery.contains(r#""shop/internal/modules/billing/usecase""#));
    assert!(!module_dir.join("delivery/grpchandler").exists());
}

#[test]
fn test_init_monorepo_then_service() {
    let temp_dir = TempDir::new().unwrap();
    let mut monorepo = params(Scope::InitMonorepo, temp_dir.path());
    monorepo.module_names.clear();
    generate(&monorepo).unwrap();

    for file in ["README.md", ".gitignore", "go.work", "sdk/sdk.go"] {
        assert!(temp_dir.path().join(file).is_file(), "missing {file}");
    }
    assert!(temp_dir.path().join("services").is_dir());
    assert_eq!(read(temp_dir.path().join("sdk/sdk.go")), "package sdk\n");

    let mut service = params(Scope::InitService, temp_dir.path());
    service.apply_monorepo_defaults().unwrap();
    service.handlers.grpc_handler = true;
    generate(&service).unwrap();

    let root = temp_dir.path().join("services/shop");
    assert!(!root.join("go.mod").exists());
    let module = read(root.join("internal/modules/billing/module.go"));
    assert!(module.contains(r#""monorepo/services/shop/internal/modules/billing/delivery/grpchandler""#));
    assert!(read(root.join("api/proto/billing/billing.proto"))
        .contains(r#"option go_package = "monorepo/sdk/shop/proto/billing";"#));
}

#[test]
fn test_invalid_names_are_rejected_before_writing() {
    let temp_dir = TempDir::new().unwrap();
    let mut params = params(Scope::InitService, temp_dir.path());
    params.module_names = vec!["9lives".to_string()];
    assert!(matches!(generate(&params), Err(Error::ValidationError(_))));
    assert!(fs::read_dir(temp_dir.path()).unwrap().next().is_none());
}

#[test]
fn test_timeout_between_trees() {
    let temp_dir = TempDir::new().unwrap();
    let renderer = MiniJinjaRenderer::new().unwrap();
    let result = Generator::new(&renderer)
        .with_timeout(Duration::ZERO)
        .run(&params(Scope::InitService, temp_dir.path()));
    assert!(matches!(result, Err(Error::TimeoutError(_))));
}
