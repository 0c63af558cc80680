//! scaffold-maker generates the skeleton of modular Go services: monorepo
//! workspaces, services, modules, handlers and use cases.

/// Command-line interface
pub mod cli;

/// Handler flags, service and module configuration, service files
pub mod config;

/// File trees and template data for each generation scope
pub mod composer;

pub mod constants;

/// Error types and handling
pub mod error;

/// Orchestration of one generation run
pub mod generator;

/// Identifier and path cleaning, casing, name validation
pub mod naming;

/// Request shape handed to the generator
pub mod params;

/// Template rendering
pub mod renderer;

/// Built-in templates
pub mod templates;

/// File-tree model and writer
pub mod tree;
