//! Common constants used throughout scaffold-maker.

/// Permission bits applied to every generated source file (rw-r--r--).
pub const FILE_MODE: u32 = 0o644;

/// Location of module packages relative to a service root.
pub const MODULES_DIR: &str = "internal/modules";

/// Import path of the framework the generated services are built on.
pub const FRAMEWORK_PACKAGE: &str = "github.com/golangid/candi";

/// Import path prefix for worker plugins given without an explicit path.
pub const PLUGIN_PACKAGE_PREFIX: &str = "github.com/golangid/candi-plugin";

/// Go version written into go.mod when the toolchain cannot be queried.
pub const DEFAULT_GO_VERSION: &str = "1.22";

/// Monorepo defaults applied by `--monorepo`.
pub const MONOREPO_PACKAGE_PREFIX: &str = "monorepo/services";
pub const MONOREPO_PROTO_PACKAGE: &str = "monorepo/sdk";
pub const MONOREPO_SERVICES_DIR: &str = "services/";
