use std::path::PathBuf;
use std::time::Instant;

use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::charts::DashboardCharts;
use crate::config::Config;
use crate::error::{ChartError, LoadError};
use crate::html;
use crate::loader::CaptureFile;
use crate::models::domain::StatisticsReport;
use crate::models::dto::{ErrorResponse, StatsResponse};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("rendering task failed: {0}")]
    Blocking(String),
}

impl DashboardError {
    pub fn status(&self) -> StatusCode {
        match self {
            DashboardError::Load(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Load(err) => err.user_message(),
            DashboardError::Chart(_) | DashboardError::Blocking(_) => {
                "Could not render the dashboard charts.".to_string()
            }
        }
    }
}

/// Per-process state shared by every worker. Holds no request data; each
/// request re-reads the capture file.
#[derive(Debug, Clone)]
pub struct Dashboard {
    capture: CaptureFile,
}

impl Dashboard {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self { capture: CaptureFile::new(data_file) }
    }

    pub fn statistics(&self) -> Result<StatisticsReport, LoadError> {
        let records = self.capture.load().map_err(|e| {
            error!(path = %self.capture.path().display(), "Error loading capture file: {}", e);
            e
        })?;
        let report = StatisticsReport::from_records(&records);
        if report.is_empty() {
            warn!(path = %self.capture.path().display(), "capture file has no packets, average size undefined");
        }
        Ok(report)
    }

    pub fn render(&self) -> Result<(StatisticsReport, DashboardCharts), DashboardError> {
        let started = Instant::now();
        let report = self.statistics()?;
        let charts = DashboardCharts::render(&report).map_err(|e| {
            error!("Error rendering charts: {}", e);
            e
        })?;
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "rendered dashboard");
        Ok((report, charts))
    }
}

#[get("/")]
async fn dashboard(state: web::Data<Dashboard>) -> impl Responder {
    let state = state.into_inner();
    let result = web::block(move || state.render())
        .await
        .map_err(|e| DashboardError::Blocking(e.to_string()))
        .and_then(|inner| inner);

    match result {
        Ok((report, charts)) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html::render_dashboard(&report, &charts, Local::now())),
        Err(e) => HttpResponse::build(e.status())
            .content_type("text/html; charset=utf-8")
            .body(html::render_error(&e.user_message())),
    }
}

#[get("/api/stats")]
async fn api_stats(state: web::Data<Dashboard>) -> impl Responder {
    let state = state.into_inner();
    let result = web::block(move || state.statistics().map_err(DashboardError::from))
        .await
        .map_err(|e| DashboardError::Blocking(e.to_string()))
        .and_then(|inner| inner);

    match result {
        Ok(report) => HttpResponse::Ok().json(StatsResponse::from(&report)),
        Err(e) => HttpResponse::build(e.status()).json(ErrorResponse { error: e.user_message() }),
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard).service(api_stats).service(health);
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let state = Dashboard::new(config.data_file.clone());
    let (host, port) = config.bind_address();
    info!(host, port, data_file = %config.data_file.display(), "Starting network analytics dashboard");
    if !config.data_file.exists() {
        warn!(
            data_file = %config.data_file.display(),
            "capture file does not exist yet; requests will report an error until it does"
        );
    }

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(configure)
    })
    .bind((host, port))?
    .run()
    .await
}
