//! Template rendering for scaffold-maker.
//! Wraps a MiniJinja environment holding the built-in templates and the
//! helper vocabulary (cleaning, casing and handler-activation helpers).
use crate::error::{Error, Result};
use crate::naming::{clean_identifier, clean_path_segment, to_pascal, to_snake};
use crate::templates::BUILTIN_TEMPLATES;
use minijinja::{Environment, UndefinedBehavior};

/// Marker prefixed to a generated line whose handler is inactive.
pub const INACTIVE_MARKER: &str = "// ";

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template source to render
    /// * `context` - Context variables for rendering
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;

    /// Renders one of the registered templates by name.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if no template with that name exists
    fn render_named(&self, name: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer with the helper vocabulary and every built-in
    /// template registered.
    pub fn new() -> Result<Self> {
        let mut env = Self::base_environment();
        for &(name, source) in BUILTIN_TEMPLATES {
            env.add_template(name, source).map_err(Error::MinijinjaError)?;
        }
        Ok(Self { env })
    }

    fn base_environment() -> Environment<'static> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        env.add_filter("clean", clean_identifier);
        env.add_filter("clean_path", clean_path_segment);
        env.add_filter("pascal", to_pascal);
        env.add_filter("snake", to_snake);
        env.add_function("is_handler_active", is_handler_active);
        env
    }
}

/// Empty when the handler is active, [`INACTIVE_MARKER`] otherwise, so a
/// line prefixed with the helper is commented out for inactive handlers.
pub fn is_handler_active(active: bool) -> String {
    if active {
        String::new()
    } else {
        INACTIVE_MARKER.to_string()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        let mut env = self.env.clone();
        env.add_template_owned("temp", template.to_string()).map_err(Error::MinijinjaError)?;

        let tmpl = env.get_template("temp").map_err(Error::MinijinjaError)?;

        tmpl.render(context).map_err(Error::MinijinjaError)
    }

    fn render_named(&self, name: &str, context: &serde_json::Value) -> Result<String> {
        let tmpl = self.env.get_template(name).map_err(Error::MinijinjaError)?;
        tmpl.render(context).map_err(Error::MinijinjaError)
    }
}
