use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::html::HtmlRenderer;
use crate::images::{DynProbe, ImageSettings};
use crate::provider::DynProvider;
use crate::view::{FormInput, Page, Presenter};
use crate::wire::Credential;

pub struct AppState {
    pub provider: DynProvider,
    pub probe: DynProbe,
    pub images: ImageSettings,
    pub configured_key: Credential,
    pub renderer: HtmlRenderer,
}

type SharedState = Arc<AppState>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/health", get(|| async { "ok" }))
        .with_state(Arc::new(state))
}

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("lesson planner listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("lesson planner shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

fn page_response(state: &AppState, page: &Page, form: &FormInput) -> Response {
    match state.renderer.render(page, form, state.configured_key.is_empty()) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "page render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("render failed: {e:#}")).into_response()
        }
    }
}

async fn index(State(state): State<SharedState>) -> Response {
    page_response(&state, &Page::Welcome, &FormInput::default())
}

async fn generate(State(state): State<SharedState>, Form(form): Form<FormInput>) -> Response {
    let presenter = Presenter {
        provider: state.provider.as_ref(),
        probe: state.probe.as_ref(),
        images: &state.images,
        configured_key: &state.configured_key,
        resolve_images: true,
    };
    let page = presenter.present(&form, true).await;
    page_response(&state, &page, &form)
}
