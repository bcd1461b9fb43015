mod cache;
mod cli;
mod debounce;
mod upstream;

use std::{env, io, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, Local, NaiveDate};
use log::{debug, info, warn};
use serde::Deserialize;
use tokio::net::TcpListener;

use inmo_agenda::{month_view, SearchOptions, Snapshot, ARGENTINA};

use crate::cache::SnapshotCache;
use crate::debounce::Debouncer;
use crate::upstream::Upstream;

struct App {
    upstream: Upstream,
    cache: Arc<SnapshotCache>,
    refresher: Debouncer,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = cli::parse(env::args().skip(1).collect());
    setup_logging();

    let app = Arc::new(App {
        upstream: Upstream::new(args.upstream, env::var("INMO_API_TOKEN").ok()),
        cache: SnapshotCache::new(cache::Config {
            enabled: args.enable_cache,
            ttl: args.cache_ttl,
        }),
        refresher: Debouncer::new(args.refresh_delay),
    });

    let router = Router::new()
        .route("/agenda", get(handle_agenda))
        .route("/locations", get(handle_locations))
        .route("/refresh", post(handle_refresh))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .with_state(app);

    let listener = TcpListener::bind(args.address).await?;
    info!("listening at http://{}", args.address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "inmo_proxy=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

#[derive(Deserialize)]
struct AgendaQuery {
    year: Option<i32>,
    month: Option<u32>,
    #[serde(default)]
    json: bool,
}

async fn handle_agenda(
    State(app): State<Arc<App>>,
    Query(query): Query<AgendaQuery>,
) -> Response {
    let today = Local::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    let Some(reference) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return (StatusCode::BAD_REQUEST, "Invalid year/month").into_response();
    };

    let Some(snapshot) = snapshot(&app).await else {
        return (StatusCode::BAD_GATEWAY, "Failed to reach the CRM backend").into_response();
    };

    let view = month_view(&snapshot, reference);

    if query.json {
        return Json(view).into_response();
    }

    (
        [("content-type", "text/calendar")],
        view.to_ics().to_string(),
    )
        .into_response()
}

#[derive(Deserialize)]
struct LocationsQuery {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
    min_chars: Option<usize>,
    #[serde(default)]
    show_on_empty: bool,
}

async fn handle_locations(Query(query): Query<LocationsQuery>) -> Response {
    let defaults = SearchOptions::default();
    let options = SearchOptions {
        min_chars: query.min_chars.unwrap_or(defaults.min_chars),
        limit: query.limit.unwrap_or(defaults.limit),
        show_on_empty: query.show_on_empty,
    };

    Json(ARGENTINA.search(&query.q, &options)).into_response()
}

/// Bursts of CRM edits land here; the debouncer folds them into one refetch.
async fn handle_refresh(State(app): State<Arc<App>>) -> StatusCode {
    let worker = Arc::clone(&app);

    app.refresher
        .call(async move {
            match worker.upstream.fetch_snapshot().await {
                Some(snapshot) => {
                    worker.cache.insert(snapshot).await;
                    info!("snapshot refreshed");
                }
                None => warn!("snapshot refresh failed"),
            }
        })
        .await;

    StatusCode::ACCEPTED
}

async fn snapshot(app: &App) -> Option<Arc<Snapshot>> {
    if let Some(snapshot) = app.cache.get().await {
        debug!("serving cached snapshot");
        return Some(snapshot);
    }

    let snapshot = app.upstream.fetch_snapshot().await?;
    Some(app.cache.insert(snapshot).await)
}
