use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use booklog_auth::{
    InMemoryIdentityStorage, InMemoryRefreshTokenStorage, JwtService, Member, TokenAuthority,
    TokenConfig, TokenState, issue_handler, logout_handler, refresh_handler,
};
use tower_http::trace::TraceLayer;

use crate::{config::AppConfig, handlers};

/// Shared components behind the router.
#[derive(Clone)]
pub struct AppState {
    pub authority: Arc<TokenAuthority>,
    pub identities: Arc<InMemoryIdentityStorage>,
    pub refresh_tokens: Arc<InMemoryRefreshTokenStorage>,
}

impl AppState {
    /// Loads the signing key and wires the token authority to in-memory stores
    /// seeded with the configured members.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let key_pair = cfg.auth.signing.load_key_pair()?;
        tracing::info!(
            kid = %key_pair.kid,
            algorithm = %key_pair.algorithm,
            "Signing key loaded"
        );
        let jwt_service = Arc::new(JwtService::new(key_pair, cfg.auth.issuer.clone()));

        let identities = Arc::new(InMemoryIdentityStorage::new());
        for seed in &cfg.members {
            identities.insert_member(Member::from(seed));
        }
        if !cfg.members.is_empty() {
            tracing::info!(count = cfg.members.len(), "Members registered");
        }

        let refresh_tokens = Arc::new(InMemoryRefreshTokenStorage::new());
        let authority = Arc::new(TokenAuthority::new(
            jwt_service,
            refresh_tokens.clone(),
            identities.clone(),
            TokenConfig::from_auth_config(&cfg.auth),
        ));

        Ok(Self {
            authority,
            identities,
            refresh_tokens,
        })
    }
}

pub fn build_app(cfg: &AppConfig, state: &AppState) -> Router {
    let mut token_routes = Router::new()
        .route("/token/refresh", post(refresh_handler))
        .route("/token/logout", post(logout_handler));
    if cfg.server.dev_issue_route {
        tracing::warn!("Development token issuance route enabled at /dev/token/{{idx}}");
        token_routes = token_routes.route("/dev/token/{idx}", post(issue_handler));
    }
    let token_routes = token_routes.with_state(TokenState::new(state.authority.clone()));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .merge(token_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri().path(),
                        http.status_code = tracing::field::Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(axum::extract::DefaultBodyLimit::max(
            cfg.server.body_limit_bytes,
        ))
}

pub struct BooklogServer {
    addr: SocketAddr,
    app: Router,
    state: AppState,
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> anyhow::Result<BooklogServer> {
        let state = AppState::from_config(&self.config)?;
        let app = build_app(&self.config, &state);

        Ok(BooklogServer {
            addr: self.addr,
            app,
            state,
        })
    }
}

impl BooklogServer {
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
