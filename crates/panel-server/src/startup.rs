//! Actix server startup + app wiring.
//!
//! Builds the player worker, routes, middleware, and OpenAPI endpoints.

use std::path::PathBuf;
use std::task::{Context, Poll};

use actix_files::{Files, NamedFile};
use actix_web::dev::{Server, ServerHandle, Service, ServiceRequest, ServiceResponse};
use actix_web::Error;
use actix_web::{App, HttpServer, web};
use anyhow::{Context as _, Result};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use stream_player::{BinaryLocator, DeviceLister, Orchestrator, PlayerHandle, PlayerWorker};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::config;
use crate::openapi;
use crate::state::AppState;

/// Build server state and start the Actix HTTP server.
pub(crate) async fn run(args: crate::Args) -> Result<()> {
    let cfg = load_config(args.config.as_ref())?;
    let bind = resolve_bind(args.bind, &cfg)?;
    let player_config = config::player_config(&cfg, args.device.as_deref())?;
    let web_ui_dir = locate_web_ui_dir(args.web_root.or_else(|| config::web_root_from_config(&cfg)));
    tracing::info!(
        bind = %bind,
        default_device = %player_config.default_device,
        settle_ms = player_config.settle_interval.as_millis() as u64,
        "starting panel-server"
    );
    if let Some(dir) = web_ui_dir.as_ref() {
        tracing::info!(path = %dir.display(), "web ui enabled");
    } else {
        tracing::info!("web ui disabled (web-ui/index.html not found)");
    }

    let worker = stream_player::spawn_player(Orchestrator::new(
        player_config,
        BinaryLocator::from_env(),
    ));
    let state = web::Data::new(AppState::new(worker.handle.clone(), DeviceLister::default()));

    let server = HttpServer::new(move || {
        let mut app = App::new()
            .app_data(state.clone())
            .app_data(api::json_config())
            .wrap(FilteredLogger)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", openapi::ApiDoc::openapi()),
            )
            .service(api::start)
            .service(api::stop)
            .service(api::status)
            .service(api::devices_list)
            .service(api::health::health);

        if let Some(dir) = web_ui_dir.clone() {
            let assets_dir = dir.join("assets");
            if assets_dir.exists() {
                app = app.service(Files::new("/assets", assets_dir));
            }

            let index_root = dir.join("index.html");
            let index_html = index_root.clone();
            app = app
                .service(
                    web::resource("/").route(web::get().to(move || serve_index(index_root.clone()))),
                )
                .service(
                    web::resource("/index.html")
                        .route(web::get().to(move || serve_index(index_html.clone()))),
                );
        }

        app
    })
    .bind(bind);

    let server = match server {
        Ok(server) => server.run(),
        Err(e) => {
            worker.shutdown();
            return Err(anyhow::Error::new(e).context(format!("bind {bind}")));
        }
    };
    setup_shutdown(worker.handle.clone(), server.handle());
    serve_until_stopped(server, worker).await
}

/// Run the HTTP server to completion, then stop playback and join the worker.
async fn serve_until_stopped(server: Server, worker: PlayerWorker) -> Result<()> {
    let result = server.await.context("http server");
    worker.shutdown();
    result
}

/// Return true when the request path should be logged.
fn should_log_path(path: &str) -> bool {
    !matches!(path, "/api/status" | "/health") && !path.starts_with("/assets/")
}

/// Actix middleware that filters noisy paths from logging.
struct FilteredLogger;

impl<S, B> actix_web::dev::Transform<S, ServiceRequest> for FilteredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = FilteredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(FilteredLoggerMiddleware { service })
    }
}

/// Service wrapper that applies the logging filter.
struct FilteredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for FilteredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_string();
        let should_log = should_log_path(&path);
        let method = req.method().clone();
        let peer = req.connection_info().realip_remote_addr().unwrap_or("-").to_string();
        let start = std::time::Instant::now();
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            if should_log {
                tracing::info!(
                    method = %method,
                    path = %path,
                    status = %res.status().as_u16(),
                    peer = %peer,
                    elapsed_ms = %start.elapsed().as_millis(),
                    "http request"
                );
            }
            Ok(res)
        })
    }
}

/// Load the config file from `--config`, or from next to the executable.
///
/// Unlike `--config`, the implicit location may be absent.
fn load_config(path: Option<&PathBuf>) -> Result<config::ServerConfig> {
    if let Some(path) = path {
        return config::ServerConfig::load(path);
    }
    let auto_path = std::env::current_exe()
        .ok()
        .and_then(|path| path.parent().map(|dir| dir.join("config.toml")));
    match auto_path {
        Some(path) if path.exists() => {
            tracing::info!(path = %path.display(), "using config next to executable");
            config::ServerConfig::load(&path)
        }
        _ => Ok(config::ServerConfig::default()),
    }
}

/// Resolve the final bind address from args + config.
fn resolve_bind(
    bind: Option<std::net::SocketAddr>,
    cfg: &config::ServerConfig,
) -> Result<std::net::SocketAddr> {
    if let Some(addr) = bind {
        return Ok(addr);
    }
    match config::bind_from_config(cfg)? {
        Some(addr) => Ok(addr),
        None => Ok(config::DEFAULT_BIND.parse()?),
    }
}

/// Pick the web UI directory: the configured one, else `web-ui` in the
/// working directory or next to the executable.
fn locate_web_ui_dir(configured: Option<PathBuf>) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = configured {
        candidates.push(dir);
    }
    if let Ok(dir) = std::env::current_dir() {
        candidates.push(dir.join("web-ui"));
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            candidates.push(parent.join("web-ui"));
        }
    }
    candidates
        .into_iter()
        .find(|dir| dir.join("index.html").exists())
}

async fn serve_index(index_path: PathBuf) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open(index_path)?)
}

/// Install Ctrl+C handler that stops playback and the HTTP server.
///
/// The handler runs on its own thread, outside the actix system, so it only
/// signals; `serve_until_stopped` joins the worker once the server returns.
fn setup_shutdown(player: PlayerHandle, server: ServerHandle) {
    if let Err(e) = ctrlc::set_handler(move || request_shutdown(&player, &server)) {
        tracing::warn!(error = %e, "ctrl-c handler not installed");
    }
}

fn request_shutdown(player: &PlayerHandle, server: &ServerHandle) {
    tracing::info!("shutdown requested");
    player.quit();
    // The stop command is queued on call; completion is awaited by `run`.
    let _ = server.stop(true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noisy_paths_are_not_logged() {
        assert!(!should_log_path("/api/status"));
        assert!(!should_log_path("/health"));
        assert!(!should_log_path("/assets/app.js"));
        assert!(should_log_path("/api/start"));
        assert!(should_log_path("/api/stop"));
    }

    #[test]
    fn resolve_bind_prefers_cli() {
        let cfg = config::ServerConfig {
            bind: Some("127.0.0.1:9000".to_string()),
            ..config::ServerConfig::default()
        };
        let cli: std::net::SocketAddr = "127.0.0.1:7000".parse().expect("addr");
        assert_eq!(resolve_bind(Some(cli), &cfg).expect("bind"), cli);
        assert_eq!(
            resolve_bind(None, &cfg).expect("bind"),
            "127.0.0.1:9000".parse::<std::net::SocketAddr>().expect("addr")
        );
        assert_eq!(
            resolve_bind(None, &config::ServerConfig::default()).expect("bind").port(),
            5000
        );
    }

    #[test]
    fn configured_web_ui_dir_requires_index() {
        let root = std::env::temp_dir().join(format!(
            "panel-server-webui-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&root).expect("create temp dir");
        let found = locate_web_ui_dir(Some(root.clone()));
        assert_ne!(found.as_ref(), Some(&root));

        std::fs::write(root.join("index.html"), "<html></html>").expect("write index");
        assert_eq!(locate_web_ui_dir(Some(root.clone())), Some(root));
    }

    #[actix_web::test]
    async fn shutdown_request_stops_server_and_playback() {
        use std::os::unix::fs::PermissionsExt;

        use nix::sys::signal::kill;
        use nix::unistd::Pid;
        use stream_player::PlayerConfig;

        let root = std::env::temp_dir().join(format!(
            "panel-server-shutdown-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&root).expect("create temp dir");
        let script = root.join("cvlc");
        std::fs::write(&script, "#!/bin/sh\necho $$ > \"$0.pid\"\nexec sleep 30\n")
            .expect("write script");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
        std::thread::sleep(std::time::Duration::from_millis(50));

        let config = PlayerConfig {
            settle_interval: std::time::Duration::from_millis(200),
            poll_interval: std::time::Duration::from_millis(20),
            sweep_names: Vec::new(),
            ..PlayerConfig::default()
        };
        let worker = stream_player::spawn_player(Orchestrator::new(
            config,
            BinaryLocator::with_dirs(vec![root.clone()]),
        ));
        assert!(worker.handle.start("http://example.com/stream", None));
        let pid: i32 = std::fs::read_to_string(root.join("cvlc.pid"))
            .expect("read pid")
            .trim()
            .parse()
            .expect("parse pid");
        assert!(kill(Pid::from_raw(pid), None).is_ok());

        let server = HttpServer::new(|| App::new().service(api::health::health))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .expect("bind")
            .run();
        let player = worker.handle.clone();
        let server_handle = server.handle();
        // Signal handlers run outside the actix system.
        std::thread::spawn(move || request_shutdown(&player, &server_handle))
            .join()
            .expect("join");

        serve_until_stopped(server, worker).await.expect("serve");
        assert!(kill(Pid::from_raw(pid), None).is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let path = PathBuf::from("/nonexistent/panel-server/config.toml");
        assert!(load_config(Some(&path)).is_err());
    }
}
