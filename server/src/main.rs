mod config;

use askama::Template;
use axum::{
    handler::HandlerWithoutStateExt,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use clap::Parser;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Args;

#[derive(Template)]
#[template(path = "notfound.html")]
struct NotFound<'a> {
    path: &'a str,
}

async fn not_found(uri: Uri) -> Response {
    match (NotFound { path: uri.path() }).render() {
        Ok(page) => (StatusCode::NOT_FOUND, Html(page)).into_response(),
        Err(err) => {
            tracing::error!(%err, "rendering not found page");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "urlshort=debug,urlshort_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let table = args.load_table()?;
    tracing::info!(paths = table.len(), policy = ?args.policy(), "loaded redirects");

    let fallback = ServeDir::new(&args.static_dir).not_found_service(not_found.into_service());
    let app = Router::new()
        .fallback_service(urlshort::map_handler(table, fallback).with_policy(args.policy()))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
