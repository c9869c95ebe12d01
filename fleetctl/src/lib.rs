//! # fleetctl: administration pages for a gaming-machine fleet
//!
//! `fleetctl` serves the back-office pages used to maintain slot machine records and the groups
//! those machines are organised into. Every page is a server-rendered HTML form backed by
//! PostgreSQL.
//!
//! ## Pages
//!
//! | Route | Purpose |
//! |---|---|
//! | `GET /machines` | Machine list |
//! | `GET/POST /machines/create` | Create a machine record |
//! | `GET /machine_groups` | Group list with member counts |
//! | `GET/POST /machine_groups/{id}/edit` | Rename a group and replace its members |
//! | `GET /healthz` | Liveness probe |
//!
//! ## Architecture
//!
//! The HTTP layer ([`api`]) is thin. Form behaviour (sanitizing, validation, duplicate checks,
//! the write itself and the audit entry) lives in [`editors`], which answer every request with a
//! [`editors::FormOutcome`]: redirect on success, redirect on a hard failure, or render the form
//! again with an error. Persistence goes through the repositories in [`db::handlers`].
//!
//! Replacing a group's members is the one multi-statement write. It runs inside a single
//! transaction so readers never see a group with a partial member list.
//!
//! ## Configuration
//!
//! See [`config`]: YAML file plus `FLEETCTL_`-prefixed environment overrides and `DATABASE_URL`.

pub mod api;
pub mod audit;
pub mod config;
pub mod db;
pub mod editors;
pub mod errors;
pub mod pages;
pub mod sanitize;
pub mod telemetry;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

use crate::audit::{AuditLog, PgAuditLog, TracingAuditLog};
use crate::config::AuditSink;
use crate::pages::Pages;
use crate::sanitize::{Sanitizer, TrimSanitizer};
use axum::{
    Router,
    response::Redirect,
    routing::get,
};
use bon::Builder;
pub use config::Config;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info};

pub use types::{BrandId, GroupId, MachineId, MachineTypeId};

/// Shared resources for request handlers.
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .config(config)
///     .pages(Arc::new(Pages::new()?))
///     .sanitizer(Arc::new(TrimSanitizer))
///     .audit(Arc::new(PgAuditLog::new(pool.clone())))
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub pages: Arc<Pages>,
    pub sanitizer: Arc<dyn Sanitizer>,
    pub audit: Arc<dyn AuditLog>,
}

/// Get the fleetctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// The audit sink selected by configuration
pub fn audit_log(config: &Config, pool: &PgPool) -> Arc<dyn AuditLog> {
    match config.audit.sink {
        AuditSink::Database => Arc::new(PgAuditLog::new(pool.clone())),
        AuditSink::Log => Arc::new(TracingAuditLog),
    }
}

async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let pool_settings = &config.database.pool;
    let connect_options = PgConnectOptions::from_str(&config.database.url)?.log_slow_statements(
        log::LevelFilter::Warn,
        Duration::from_millis(config.slow_statement_threshold_ms),
    );

    let pool = PgPoolOptions::new()
        .max_connections(pool_settings.max_connections)
        .min_connections(pool_settings.min_connections)
        .acquire_timeout(Duration::from_secs(pool_settings.acquire_timeout_secs))
        .idle_timeout(pool_settings.idle_timeout())
        .max_lifetime(pool_settings.max_lifetime())
        .connect_with(connect_options)
        .await?;

    Ok(pool)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/machines") }))
        .route("/healthz", get(|| async { "OK" }))
        .route("/machines", get(api::handlers::machines::list_machines))
        .route(
            "/machines/create",
            get(api::handlers::machines::create_machine_form).post(api::handlers::machines::create_machine),
        )
        .route("/machine_groups", get(api::handlers::machine_groups::list_groups))
        .route(
            "/machine_groups/{id}/edit",
            get(api::handlers::machine_groups::edit_group_form).post(api::handlers::machine_groups::update_group),
        )
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Lifecycle:
///
/// 1. [`Application::new`] connects to the database, runs migrations and builds the router
/// 2. [`Application::serve`] binds the listener and handles requests until the shutdown future
///    resolves, then closes the pool and flushes telemetry
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Use `pool` instead of connecting from configuration
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        debug!("Starting fleetctl with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => pool,
            None => connect(&config).await?,
        };
        migrator().run(&pool).await?;

        let state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .pages(Arc::new(Pages::new()?))
            .sanitizer(Arc::new(TrimSanitizer))
            .audit(audit_log(&config, &pool))
            .build();

        let router = build_router(state);

        Ok(Self { router, config, pool })
    }

    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("fleetctl listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::test_utils::*;
    use axum::http::{StatusCode, header};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_root_redirects_to_machines(pool: PgPool) {
        let server = create_test_server(pool).await;

        let response = server.get("/").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(header::LOCATION), "/machines");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_healthz(pool: PgPool) {
        let server = create_test_server(pool).await;

        let response = server.get("/healthz").await;

        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_pages_show_flash_messages(pool: PgPool) {
        let server = create_test_server(pool).await;

        let machines = server.get("/machines?message=Machine+created+successfully").await;
        machines.assert_status_ok();
        assert!(machines.text().contains("Machine created successfully"));

        let groups = server.get("/machine_groups?error=Group+not+found").await;
        groups.assert_status_ok();
        assert!(groups.text().contains("Group not found"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_group_list_shows_member_counts(pool: PgPool) {
        let machines = create_test_machines(&pool, 3).await;
        create_test_group(&pool, "Floor A", None, &machines).await;
        let server = create_test_server(pool).await;

        let response = server.get("/machine_groups").await;

        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("Floor A"));
        assert!(body.contains("<td>3</td>"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_database_audit_sink_writes_rows(pool: PgPool) {
        let type_id = create_test_machine_type(&pool, "Video Slot").await.to_string();
        let server = create_test_server(pool.clone()).await;

        server
            .post("/machines/create")
            .form(&[
                ("machine_number", "M-1"),
                ("model", "Buffalo"),
                ("type_id", type_id.as_str()),
                ("credit_value", "0.01"),
            ])
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let mut conn = pool.acquire().await.unwrap();
        let entries = crate::db::handlers::AuditEntries::new(&mut conn).list_recent(5).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "create_machine");
        assert_eq!(entries[0].description, "Created machine: M-1");
    }
}
