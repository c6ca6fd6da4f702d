/*
 * This file is part of Temperature Exporter.
 *
 * Copyright (C) 2025 Temperature Exporter contributors
 *
 * Temperature Exporter is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Temperature Exporter is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Temperature Exporter. If not, see <https://www.gnu.org/licenses/>.
 */

//! HTTP scrape endpoint
//!
//! Serves `GET /metrics`. Every request performs a fresh collection on the
//! blocking pool; nothing is cached between scrapes.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, error, info, Level};

use crate::collector::{Collector, Scrape};
use crate::constants::http::{CONTENT_TYPE, METRICS_PATH};
use crate::exposition::{render, BuildInfo};

/// Shared state handed to the handler.
#[derive(Clone)]
pub struct AppState {
    pub collector: Arc<Collector>,
    pub build: BuildInfo,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(METRICS_PATH, get(metrics))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .with_state(state)
}

/// Collect once and render the exposition body, logging every error.
pub fn scrape(collector: &Collector, build: &BuildInfo) -> String {
    let Scrape { readings, errors } = collector.collect();
    for e in &errors {
        error!("Failed to read temperature: {}", e);
    }
    for reading in &readings {
        debug!("Found temperature: {}: {:.6}", reading.device, reading.celsius);
    }
    render(&readings, build)
}

async fn metrics(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
) -> Response {
    let collector = state.collector.clone();
    let build = state.build;
    match tokio::task::spawn_blocking(move || scrape(&collector, &build)).await {
        Ok(body) => {
            info!("{} metrics served successfully", remote);
            ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
        }
        Err(e) => {
            error!("Collection task failed for {}: {}", remote, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "collection failed\n").into_response()
        }
    }
}

/// Bind `addr` and serve until SIGINT/SIGTERM.
pub async fn run_server(addr: &str, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        build_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGNAL: Received SIGINT - shutting down"),
        _ = terminate => info!("SIGNAL: Received SIGTERM - shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandSpec, MockCommandRunner};
    use crate::test_utils::{fake_thermal_tree, runner_printing, runner_without_programs};
    use axum::body::Body;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const BUILD: BuildInfo = BuildInfo {
        version: "0.1.0",
        build_time: "manual",
    };

    fn test_app(root: &std::path::Path, runner: MockCommandRunner) -> Router {
        let collector = Collector::new(
            root,
            vec![CommandSpec::vcgencmd().compile().unwrap()],
            Arc::new(runner),
        );
        build_router(AppState {
            collector: Arc::new(collector),
            build: BUILD,
        })
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))))
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn metrics_renders_commands_then_zones() {
        let tmp = fake_thermal_tree(&[("thermal_zone0", "cpu-thermal", "48312")]);
        let runner = runner_printing("temp=48.3'C\n");

        let response = get(test_app(tmp.path(), runner), "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            CONTENT_TYPE
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            "gpu_temperature{device=\"gpu\"} 48.300000\n\
             cpu_temperature{device=\"cpu\"} 48.312000\n\
             version{app=\"0.1.0\", build_time=\"manual\"} 1\n"
        );
    }

    #[tokio::test]
    async fn metrics_survives_total_sensor_failure() {
        let tmp = fake_thermal_tree(&[]);
        let app = test_app(&tmp.path().join("absent"), runner_without_programs());
        let response = get(app, "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            "version{app=\"0.1.0\", build_time=\"manual\"} 1\n"
        );
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let tmp = fake_thermal_tree(&[]);
        let mut runner = MockCommandRunner::new();
        runner.expect_exists().never();

        let response = get(test_app(tmp.path(), runner), "/").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
