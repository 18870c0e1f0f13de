//! MiniJinja template engine wrapper
//!
//! Templates are looked up by name relative to the configured directory
//! (`hello/index.html` -> `<dir>/hello/index.html`), loaded on first use
//! and cached by the environment afterwards.

use minijinja::{Environment, ErrorKind};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::TemplatesConfig;

/// Errors raised while looking up or rendering a template
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template not found: {name}")]
    NotFound { name: String },

    #[error("failed to render template: {0}")]
    Render(#[from] minijinja::Error),
}

pub struct TemplateEngine {
    env: Environment<'static>,
    dir: PathBuf,
}

impl TemplateEngine {
    pub fn new(config: &TemplatesConfig) -> Self {
        let mut env = Environment::new();

        env.set_debug(config.debug);
        // Body must match the template file byte for byte
        env.set_keep_trailing_newline(true);
        env.set_loader(minijinja::path_loader(&config.dir));

        Self {
            env,
            dir: PathBuf::from(&config.dir),
        }
    }

    /// Render a template with context
    pub fn render<S: Serialize>(&self, template_name: &str, ctx: S) -> Result<String, TemplateError> {
        let template = self.env.get_template(template_name).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                TemplateError::NotFound {
                    name: template_name.to_string(),
                }
            } else {
                TemplateError::Render(e)
            }
        })?;
        Ok(template.render(ctx)?)
    }

    /// Template directory exists and can be listed
    pub fn is_ready(&self) -> bool {
        std::fs::read_dir(&self.dir).is_ok()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;
    use std::fs;

    fn engine_with(files: &[(&str, &str)]) -> (tempfile::TempDir, TemplateEngine) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        let engine = TemplateEngine::new(&TemplatesConfig {
            dir: dir.path().to_str().unwrap().to_string(),
            debug: false,
        });
        (dir, engine)
    }

    #[test]
    fn test_render_nested_name() {
        let (_dir, engine) = engine_with(&[("hello/index.html", "<h1>Hello World</h1>")]);
        let html = engine.render("hello/index.html", context! {}).unwrap();
        assert_eq!(html, "<h1>Hello World</h1>");
    }

    #[test]
    fn test_trailing_newline_kept() {
        let (_dir, engine) = engine_with(&[("page.html", "<p>hi</p>\n")]);
        assert_eq!(engine.render("page.html", context! {}).unwrap(), "<p>hi</p>\n");
    }

    #[test]
    fn test_context_and_autoescape() {
        let (_dir, engine) = engine_with(&[("greet.html", "<p>{{ name }}</p>")]);
        let html = engine
            .render("greet.html", context! { name => "<b>Ann" })
            .unwrap();
        assert_eq!(html, "<p>&lt;b&gt;Ann</p>");
    }

    #[test]
    fn test_missing_template() {
        let (_dir, engine) = engine_with(&[]);
        let err = engine.render("hello/index.html", ()).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { ref name } if name == "hello/index.html"));
        assert_eq!(err.to_string(), "template not found: hello/index.html");
    }

    #[test]
    fn test_syntax_error() {
        let (_dir, engine) = engine_with(&[("broken.html", "{% if %}")]);
        let err = engine.render("broken.html", ()).unwrap_err();
        assert!(matches!(err, TemplateError::Render(_)));
    }

    #[test]
    fn test_is_ready() {
        let (dir, engine) = engine_with(&[]);
        assert!(engine.is_ready());
        assert_eq!(engine.dir(), dir.path());
        drop(dir);
        assert!(!engine.is_ready());
    }
}
