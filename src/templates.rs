//! Built-in templates and literal files of the generated service skeleton.
//!
//! Templates are registered by name in the renderer environment; literals
//! are written verbatim. Optional handlers are expressed with `{% if %}`
//! blocks over the activation flags of the data context.

pub const DEFAULT_PACKAGE: &str = "default/package";
pub const LICENSE_MIT: &str = "license/mit";
pub const LICENSE_APACHE: &str = "license/apache";
pub const LICENSE_PRIVATE: &str = "license/private";
pub const MONOREPO_README: &str = "monorepo/README.md";
pub const MONOREPO_GO_WORK: &str = "monorepo/go.work";
pub const SERVICE_MAIN: &str = "service/main.go";
pub const SERVICE_REGISTRY: &str = "service/service.go";
pub const SERVICE_GO_MOD: &str = "service/go.mod";
pub const SERVICE_README: &str = "service/README.md";
pub const MODULE_MAIN: &str = "module/module.go";
pub const MODULE_USECASE: &str = "module/usecase.go";
pub const MODULE_REPOSITORY: &str = "module/repository.go";
pub const REST_HANDLER: &str = "delivery/resthandler.go";
pub const GRPC_HANDLER: &str = "delivery/grpchandler.go";
pub const GRAPHQL_HANDLER: &str = "delivery/graphqlhandler.go";
pub const WORKER_HANDLER: &str = "worker/handler.go";
pub const PLUGIN_HANDLER: &str = "worker/plugin.go";
pub const PROTO_SCHEMA: &str = "api/module.proto";
pub const GRAPHQL_SCHEMA: &str = "api/module.graphql";
pub const USECASE_ITEM: &str = "usecase/item.go";
pub const USECASE_DELIVERY: &str = "usecase/delivery.go";

/// Every template the renderer registers at construction.
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (DEFAULT_PACKAGE, "package {{ package_name }}\n"),
    (LICENSE_MIT, MIT_LICENSE),
    (LICENSE_APACHE, APACHE_LICENSE),
    (LICENSE_PRIVATE, PRIVATE_LICENSE),
    (MONOREPO_README, MONOREPO_README_TEMPLATE),
    (MONOREPO_GO_WORK, "go {{ go_version }}\n"),
    (SERVICE_MAIN, SERVICE_MAIN_TEMPLATE),
    (SERVICE_REGISTRY, SERVICE_REGISTRY_TEMPLATE),
    (SERVICE_GO_MOD, "module {{ module_path }}\n\ngo {{ go_version }}\n"),
    (SERVICE_README, SERVICE_README_TEMPLATE),
    (MODULE_MAIN, MODULE_MAIN_TEMPLATE),
    (MODULE_USECASE, MODULE_USECASE_TEMPLATE),
    (MODULE_REPOSITORY, MODULE_REPOSITORY_TEMPLATE),
    (REST_HANDLER, REST_HANDLER_TEMPLATE),
    (GRPC_HANDLER, GRPC_HANDLER_TEMPLATE),
    (GRAPHQL_HANDLER, GRAPHQL_HANDLER_TEMPLATE),
    (WORKER_HANDLER, WORKER_HANDLER_TEMPLATE),
    (PLUGIN_HANDLER, PLUGIN_HANDLER_TEMPLATE),
    (PROTO_SCHEMA, PROTO_SCHEMA_TEMPLATE),
    (GRAPHQL_SCHEMA, GRAPHQL_SCHEMA_TEMPLATE),
    (USECASE_ITEM, USECASE_ITEM_TEMPLATE),
    (USECASE_DELIVERY, USECASE_DELIVERY_TEMPLATE),
];

/// Environment descriptor read by the generated service at startup.
pub const ENV_SAMPLE: &str = r"# Basic env configuration

# Service Handlers
USE_REST=[bool]
USE_GRPC=[bool]
USE_GRAPHQL=[bool]
USE_KAFKA_CONSUMER=[bool]
USE_CRON_SCHEDULER=[bool]
USE_REDIS_SUBSCRIBER=[bool]
USE_TASK_QUEUE_WORKER=[bool]
USE_POSTGRES_LISTENER_WORKER=[bool]
USE_RABBITMQ_CONSUMER=[bool]

HTTP_PORT=[int]
GRPC_PORT=[int]
GRAPHQL_DISABLE_INTROSPECTION=[bool]

BASIC_AUTH_USERNAME=[string]
BASIC_AUTH_PASS=[string]

MONGODB_HOST_WRITE=[string]
MONGODB_HOST_READ=[string]
MONGODB_DATABASE_NAME=[string]

SQL_DRIVER_NAME=[string]
SQL_DB_READ_DSN=[string]
SQL_DB_WRITE_DSN=[string]

ARANGODB_HOST_WRITE=[string]
ARANGODB_HOST_READ=[string]
ARANGODB_DATABASE=[string]

REDIS_READ_DSN=[string]
REDIS_WRITE_DSN=[string]

KAFKA_BROKERS=[string]
KAFKA_CLIENT_ID=[string]
KAFKA_CONSUMER_GROUP=[string]

RABBITMQ_BROKER=[string]
RABBITMQ_CONSUMER_GROUP=[string]
RABBITMQ_EXCHANGE_NAME=[string]

MAX_GOROUTINES=[int]
";

pub const GITIGNORE: &str = r"# Binaries
bin/
*.exe
*.test
*.out

# Local configuration
.env
vendor/
";

const MIT_LICENSE: &str = r"MIT License

Copyright (c) {{ year }} {{ owner }}

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the Software), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED AS IS, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
";

const APACHE_LICENSE: &str = r"Copyright {{ year }} {{ owner }}

Licensed under the Apache License, Version 2.0 (the License);
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an AS IS BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
";

const PRIVATE_LICENSE: &str = r"Copyright (c) {{ year }} {{ owner }}. All rights reserved.

This source code is proprietary and confidential. Unauthorized copying,
distribution or use of this file, via any medium, is strictly prohibited.
";

const MONOREPO_README_TEMPLATE: &str = r"# Monorepo

{{ header }}

Services live under `services/`, shared generated clients under `sdk/`.
";

const SERVICE_README_TEMPLATE: &str = r"# {{ service_name }}

{{ header }}

## Modules
{% for module in module_names %}
- `{{ module }}`
{% endfor %}

## Handlers
{% if rest_handler or fiber_rest_handler %}
- REST
{% endif %}
{% if grpc_handler %}
- GRPC
{% endif %}
{% if graphql_handler %}
- GraphQL
{% endif %}
{% if is_worker_active %}
- Workers
{% endif %}
";

const SERVICE_MAIN_TEMPLATE: &str = r#"// {{ header }}

package main

import (
	"context"
	"fmt"
	"runtime/debug"
	"time"

	service "{{ module_path }}/internal"

	"{{ framework }}/codebase/app"
	"{{ framework }}/config"
)

const serviceName = "{{ service_name }}"

func main() {
	ctx, cancel := context.WithTimeout(context.Background(), 1*time.Minute)
	defer func() {
		cancel()
		if r := recover(); r != nil {
			fmt.Printf("Failed to start %s service: %v\n", serviceName, r)
			fmt.Printf("Stack trace: \n%s\n", debug.Stack())
		}
	}()

	cfg := config.Init(ctx, ".")
	defer cfg.Exit(ctx)

	srv := service.NewService(serviceName, cfg)
	app.New(srv).Run(ctx)
}
"#;

const SERVICE_REGISTRY_TEMPLATE: &str = r#"// {{ header }}

package service

import (
{% for module in module_names %}
	"{{ module_path }}/internal/modules/{{ module }}"
{% endfor %}

	"{{ framework }}/codebase/factory"
	"{{ framework }}/codebase/factory/dependency"
	"{{ framework }}/codebase/factory/types"
	"{{ framework }}/config"
)

// Service model
type Service struct {
	deps    dependency.Dependency
	modules []factory.ModuleFactory
	name    types.Service
}

// NewService in this service
func NewService(serviceName string, cfg *config.Config) factory.ServiceFactory {
	deps := dependency.InitDependency(
		dependency.SetMiddleware(cfg.Middleware),
{% if redis_deps %}
		dependency.SetRedisPool(cfg.RedisPool),
{% endif %}
{% if sql_deps %}
		dependency.SetSQLDatabase(cfg.SQLDatabase),
{% endif %}
{% if mongo_deps %}
		dependency.SetMongoDatabase(cfg.MongoDatabase),
{% endif %}
{% if arango_deps %}
		dependency.SetArangoDatabase(cfg.ArangoDatabase),
{% endif %}
	)

	modules := []factory.ModuleFactory{
{% for module in module_names %}
		{{ module | clean }}.NewModule(deps),
{% endfor %}
	}

	return &Service{
		deps:    deps,
		modules: modules,
		name:    types.Service(serviceName),
	}
}

// GetDependency method
func (s *Service) GetDependency() dependency.Dependency {
	return s.deps
}

// GetModules method
func (s *Service) GetModules() []factory.ModuleFactory {
	return s.modules
}

// Name method
func (s *Service) Name() types.Service {
	return s.name
}
"#;

const MODULE_MAIN_TEMPLATE: &str = r#"// {{ header }}

package {{ module | clean }}

import (
{% if graphql_handler %}
	"{{ module_path }}/internal/modules/{{ module }}/delivery/graphqlhandler"
{% endif %}
{% if grpc_handler %}
	"{{ module_path }}/internal/modules/{{ module }}/delivery/grpchandler"
{% endif %}
{% if rest_handler or fiber_rest_handler %}
	"{{ module_path }}/internal/modules/{{ module }}/delivery/resthandler"
{% endif %}
{% if is_worker_active %}
	"{{ module_path }}/internal/modules/{{ module }}/delivery/workerhandler"
{% endif %}

	"{{ framework }}/codebase/factory/dependency"
	"{{ framework }}/codebase/factory/types"
	"{{ framework }}/codebase/interfaces"
)

const (
	moduleName types.Module = "{{ module | upper | clean }}"
)

// Module model
type Module struct {
	restHandler    interfaces.RESTHandler
	grpcHandler    interfaces.GRPCHandler
	graphqlHandler interfaces.GraphQLHandler

	workerHandlers map[types.Worker]interfaces.WorkerHandler
}

// NewModule module constructor
func NewModule(deps dependency.Dependency) *Module {
	var mod Module
{% if rest_handler or fiber_rest_handler %}
	mod.restHandler = resthandler.NewRestHandler(deps.GetMiddleware())
{% endif %}
{% if grpc_handler %}
	mod.grpcHandler = grpchandler.NewGRPCHandler(deps.GetMiddleware())
{% endif %}
{% if graphql_handler %}
	mod.graphqlHandler = graphqlhandler.NewGraphQLHandler(deps.GetMiddleware())
{% endif %}
{% if is_worker_active %}

	mod.workerHandlers = map[types.Worker]interfaces.WorkerHandler{
{% for worker in workers %}
		{{ worker.identifier }}: workerhandler.{{ worker.constructor }}(),
{% endfor %}
{% for plugin in module_plugins %}
		{{ plugin.identifier }}: workerhandler.{{ plugin.constructor }}(),
{% endfor %}
	}
{% endif %}

	return &mod
}

// RESTHandler method
func (m *Module) RESTHandler() interfaces.RESTHandler {
	return m.restHandler
}

// GRPCHandler method
func (m *Module) GRPCHandler() interfaces.GRPCHandler {
	return m.grpcHandler
}

// GraphQLHandler method
func (m *Module) GraphQLHandler() interfaces.GraphQLHandler {
	return m.graphqlHandler
}

// WorkerHandler method
func (m *Module) WorkerHandler(workerType types.Worker) interfaces.WorkerHandler {
	return m.workerHandlers[workerType]
}

// Name get module name
func (m *Module) Name() types.Module {
	return moduleName
}
"#;

const MODULE_USECASE_TEMPLATE: &str = r"// {{ header }}

package usecase

// Usecase groups the business operations of module {{ module }}.
// Add one file per use case next to this one.
type Usecase interface{}
";

const MODULE_REPOSITORY_TEMPLATE: &str = r#"// {{ header }}

package repository

import (
{% if sql_deps %}
{% if sql_use_gorm %}
	"gorm.io/gorm"

	_ "{{ gorm_package }}"
{% else %}
	"database/sql"

	_ "{{ sql_driver_package }}"
{% endif %}
{% endif %}
{% if mongo_deps %}
	"go.mongodb.org/mongo-driver/mongo"
{% endif %}
{% if redis_deps %}
	"github.com/gomodule/redigo/redis"
{% endif %}
)

// Repository of module {{ module }}
type Repository struct {
{% if sql_deps %}
{% if sql_use_gorm %}
	db *gorm.DB
{% else %}
	db *sql.DB
{% endif %}
{% endif %}
{% if mongo_deps %}
	mongo *mongo.Database
{% endif %}
{% if redis_deps %}
	cache *redis.Pool
{% endif %}
}
"#;

const REST_HANDLER_TEMPLATE: &str = r#"// {{ header }}

package resthandler

import (
	"net/http"

{% if fiber_rest_handler %}
	"github.com/gofiber/fiber/v2"

{% endif %}
	"{{ framework }}/codebase/interfaces"
)

// RestHandler handler
type RestHandler struct {
	mw interfaces.Middleware
}

// NewRestHandler create new rest handler
func NewRestHandler(mw interfaces.Middleware) *RestHandler {
	return &RestHandler{mw: mw}
}

{% if fiber_rest_handler %}
// MountFiber registers routes on a fiber router
func (h *RestHandler) MountFiber(root fiber.Router) {
	root.Get("/v1/{{ module | clean_path }}", func(c *fiber.Ctx) error {
		return c.Status(http.StatusOK).SendString("{{ service_name }}/{{ module }}")
	})
}
{% else %}
// Mount handler with root "/"
func (h *RestHandler) Mount(root interfaces.RESTRouter) {
	v1 := root.Group("/v1/{{ module | clean_path }}")
	v1.GET("", h.hello)
}

func (h *RestHandler) hello(w http.ResponseWriter, r *http.Request) {
	w.WriteHeader(http.StatusOK)
	w.Write([]byte("{{ service_name }}/{{ module }}"))
}
{% endif %}
"#;

const GRPC_HANDLER_TEMPLATE: &str = r#"// {{ header }}

package grpchandler

import (
	"google.golang.org/grpc"

	"{{ framework }}/codebase/interfaces"
)

// GRPCHandler rpc handler
type GRPCHandler struct {
	mw interfaces.Middleware
}

// NewGRPCHandler func
func NewGRPCHandler(mw interfaces.Middleware) *GRPCHandler {
	return &GRPCHandler{mw: mw}
}

// Register grpc server, generated stubs live in {{ proto_source }}/{{ module }}
func (h *GRPCHandler) Register(server *grpc.Server, mwGroup *interfaces.MiddlewareGroup) {
}
"#;

const GRAPHQL_HANDLER_TEMPLATE: &str = r#"// {{ header }}

package graphqlhandler

import (
	"{{ framework }}/codebase/interfaces"
)

// GraphQLHandler model
type GraphQLHandler struct {
	mw interfaces.Middleware
}

// NewGraphQLHandler delivery
func NewGraphQLHandler(mw interfaces.Middleware) *GraphQLHandler {
	return &GraphQLHandler{mw: mw}
}

// Query resolver, schema in api/graphql/{{ module }}.graphql
func (h *GraphQLHandler) Query() interface{} {
	return h
}

// Hello resolver
func (h *GraphQLHandler) Hello() string {
	return "{{ service_name }}/{{ module }}"
}
"#;

const WORKER_HANDLER_TEMPLATE: &str = r#"// {{ header }}

package workerhandler

import (
	"context"

	"{{ framework }}/codebase/factory/types"
)

// {{ worker.struct_name }} worker handler
type {{ worker.struct_name }} struct{}

// {{ worker.constructor }} constructor
func {{ worker.constructor }}() *{{ worker.struct_name }} {
	return &{{ worker.struct_name }}{}
}

// MountHandlers mount handler group
func (h *{{ worker.struct_name }}) MountHandlers(group *types.WorkerHandlerGroup) {
	group.Add("{{ module | clean_path }}", h.handle)
}

func (h *{{ worker.struct_name }}) handle(ctx context.Context, message []byte) error {
	return nil
}
"#;

const PLUGIN_HANDLER_TEMPLATE: &str = r#"// {{ header }}

package workerhandler

import (
	"context"

	"{{ framework }}/codebase/factory/types"

	_ "{{ plugin.package_path }}"
)

// {{ plugin.struct_name }} handler for worker plugin {{ plugin.name }}
type {{ plugin.struct_name }} struct{}

// {{ plugin.constructor }} constructor
func {{ plugin.constructor }}() *{{ plugin.struct_name }} {
	return &{{ plugin.struct_name }}{}
}

// MountHandlers mount handler group
func (h *{{ plugin.struct_name }}) MountHandlers(group *types.WorkerHandlerGroup) {
	group.Add("{{ module | clean_path }}", h.handle)
}

func (h *{{ plugin.struct_name }}) handle(ctx context.Context, message []byte) error {
	return nil
}
"#;

const PROTO_SCHEMA_TEMPLATE: &str = r#"// {{ header }}

syntax = "proto3";
package {{ module | clean }};
option go_package = "{{ proto_source }}/{{ module }}";

service {{ module | pascal }}Handler {
	rpc Hello(Request) returns (Response);
}

message Request {
	string message = 1;
}

message Response {
	string message = 1;
}
"#;

const GRAPHQL_SCHEMA_TEMPLATE: &str = r"# {{ header }}

type {{ module | pascal }}Query {
	hello: String!
}
";

const USECASE_ITEM_TEMPLATE: &str = r#"// {{ header }}

package usecase

import (
	"context"
)

// {{ usecase | pascal }}Request input of use case {{ usecase }}
type {{ usecase | pascal }}Request struct{}

// {{ usecase | pascal }}Response output of use case {{ usecase }}
type {{ usecase | pascal }}Response struct{}

// {{ usecase | pascal }} use case of module {{ module }}
func {{ usecase | pascal }}(ctx context.Context, req {{ usecase | pascal }}Request) (resp {{ usecase | pascal }}Response, err error) {
	return resp, nil
}
"#;

const USECASE_DELIVERY_TEMPLATE: &str = r#"// {{ header }}

package {{ delivery }}

import (
	"context"

	"{{ module_path }}/internal/modules/{{ module }}/usecase"
)

// {{ usecase | pascal }} forwards {{ delivery }} requests to use case {{ usecase }}
func {{ usecase | pascal }}(ctx context.Context) error {
	_, err := usecase.{{ usecase | pascal }}(ctx, usecase.{{ usecase | pascal }}Request{})
	return err
}
"#;
