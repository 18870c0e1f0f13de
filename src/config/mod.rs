// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::views::View;

pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig,
    ServerConfig, TemplatesConfig,
};

/// Environment variable prefix, e.g. `HELLO__SERVER__PORT=9000`
const ENV_PREFIX: &str = "HELLO";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            );

        let mut cfg: Self = Self::with_defaults(settings)?.build()?.try_deserialize()?;

        // `config` lowercases table keys; request paths are case-sensitive
        if let Some(views) = read_view_routes(config_path)? {
            cfg.routes.views = views;
        }
        Ok(cfg)
    }

    /// Built-in defaults only, no file or environment sources
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::with_defaults(config::Config::builder())?
            .build()?
            .try_deserialize()
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.default_content_type", "text/html; charset=utf-8")?
            .set_default("http.server_name", "hello-site")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("templates.dir", "templates")?
            .set_default("templates.debug", false)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[derive(Deserialize)]
struct ViewRoutesFile {
    #[serde(default)]
    routes: Option<ViewRoutesSection>,
}

#[derive(Deserialize)]
struct ViewRoutesSection {
    #[serde(default)]
    views: Option<HashMap<String, View>>,
}

/// Read `[routes.views]` straight from the TOML file, keys as written
fn read_view_routes(
    config_path: &str,
) -> Result<Option<HashMap<String, View>>, config::ConfigError> {
    let Some(path) = toml_file_for(config_path) else {
        return Ok(None);
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let parsed: ViewRoutesFile = toml::from_str(&content).map_err(|e| {
        config::ConfigError::Message(format!("{}: {e}", path.display()))
    })?;

    Ok(parsed.routes.and_then(|r| r.views))
}

fn toml_file_for(config_path: &str) -> Option<PathBuf> {
    let exact = Path::new(config_path);
    if exact.extension().is_some_and(|ext| ext == "toml") && exact.is_file() {
        return Some(exact.to_path_buf());
    }
    let with_ext = PathBuf::from(format!("{config_path}.toml"));
    with_ext.is_file().then_some(with_ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // load_from reads HELLO__* variables; keep env-touching tests apart
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::defaults().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.http.default_content_type, "text/html; charset=utf-8");
        assert_eq!(cfg.templates.dir, "templates");
        assert!(!cfg.templates.debug);
        assert_eq!(cfg.routes.views.get("/"), Some(&View::HelloWorld));
        assert_eq!(cfg.routes.health.liveness_path, "/healthz");
        assert_eq!(cfg.logging.access_log_format, "combined");
    }

    #[test]
    fn test_load_from_file() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("site.toml")).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[templates]
dir = "site/templates"

[routes.views]
"/hello/" = "hello_world"
"#
        )
        .unwrap();

        let path = dir.path().join("site");
        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();

        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.templates.dir, "site/templates");
        assert_eq!(cfg.routes.views.get("/hello/"), Some(&View::HelloWorld));
        assert!(cfg.routes.health.enabled);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let _env = env_lock();
        let cfg = Config::load_from("definitely/not/a/config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.routes.views.get("/"), Some(&View::HelloWorld));
    }

    #[test]
    fn test_route_keys_keep_their_case() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        std::fs::write(
            &path,
            r#"
[routes.views]
"/Hello/" = "hello_world"
"/index.html" = "hello_world"
"#,
        )
        .unwrap();

        // Both the bare name and the explicit .toml path resolve the file
        for config_path in [dir.path().join("site"), path] {
            let cfg = Config::load_from(config_path.to_str().unwrap()).unwrap();
            assert_eq!(cfg.routes.views.get("/Hello/"), Some(&View::HelloWorld));
            assert_eq!(cfg.routes.views.get("/hello/"), None);
            assert_eq!(cfg.routes.views.get("/index.html"), Some(&View::HelloWorld));
            assert_eq!(cfg.routes.views.len(), 2);
        }
    }

    #[test]
    fn test_file_without_views_keeps_default_route() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("site.toml"), "[server]\nport = 9191\n").unwrap();

        let cfg = Config::load_from(dir.path().join("site").to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9191);
        assert_eq!(cfg.routes.views.get("/"), Some(&View::HelloWorld));
    }

    #[test]
    fn test_env_overrides() {
        let _env = env_lock();
        std::env::set_var("HELLO__SERVER__PORT", "9000");
        std::env::set_var("HELLO__TEMPLATES__DEBUG", "true");

        let loaded = Config::load_from("definitely/not/a/config");

        std::env::remove_var("HELLO__SERVER__PORT");
        std::env::remove_var("HELLO__TEMPLATES__DEBUG");

        let cfg = loaded.unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert!(cfg.templates.debug);
        assert_eq!(cfg.server.host, "127.0.0.1");
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::defaults().unwrap();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8080".parse().unwrap()
        );
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
