//! Web API Module
//!
//! Exposes the salary report endpoints and the insights proxy.
//! All endpoints return JSON and require no authentication.

use crate::config::{AppConfig, CorsOrigins};
use crate::insights::{provider_from_config, InsightsError, InsightsProvider};
use actix_cors::Cors;
use actix_web::{error, middleware, web, App, HttpResponse, HttpServer, Responder};
use salary_core::{QueryError, ReportService, YearParam};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const REPORTS_FAILED: &str = "Failed to process reports";
pub const INSIGHTS_UNAVAILABLE: &str = "Insights service unavailable";

// ============================================================
// APPLICATION STATE
// ============================================================

/// Shared application state
pub struct AppState {
    pub reports: ReportService,
    pub insights: Box<dyn InsightsProvider>,
}

impl AppState {
    pub fn new(reports: ReportService, insights: Box<dyn InsightsProvider>) -> Self {
        Self { reports, insights }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, InsightsError> {
        Ok(Self {
            reports: ReportService::new(config.source.build()),
            insights: provider_from_config(config.insights.as_ref())?,
        })
    }
}

// ============================================================
// API REQUEST/RESPONSE TYPES
// ============================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub result: String,
}

// ============================================================
// API HANDLERS
// ============================================================

async fn index() -> impl Responder {
    HttpResponse::Ok().json(MessageBody::new("Welcome to the Salary Reports API"))
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "Salary Reports API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn query_error_response(err: QueryError) -> HttpResponse {
    match err {
        QueryError::NotFound { .. } => HttpResponse::NotFound().json(MessageBody::new(err.to_string())),
        // Detail was already logged by the report service.
        QueryError::SourceUnavailable(_) => {
            HttpResponse::InternalServerError().json(MessageBody::new(REPORTS_FAILED))
        }
    }
}

fn blocking_error_response(err: error::BlockingError) -> HttpResponse {
    log::error!("[REPORTS] Blocking task failed: {}", err);
    HttpResponse::InternalServerError().json(MessageBody::new(REPORTS_FAILED))
}

/// Yearly job count and average salary
async fn get_reports(data: web::Data<Arc<AppState>>) -> HttpResponse {
    let service = data.reports.clone();
    match web::block(move || service.yearly_reports()).await {
        Ok(Ok(reports)) => HttpResponse::Ok().json(reports),
        Ok(Err(e)) => query_error_response(e),
        Err(e) => blocking_error_response(e),
    }
}

/// Job-title counts for one year
async fn get_reports_for_year(
    data: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> HttpResponse {
    let year = YearParam::parse(&path.into_inner());
    let service = data.reports.clone();
    match web::block(move || service.job_titles_for_year(year)).await {
        Ok(Ok(counts)) => HttpResponse::Ok().json(counts),
        Ok(Err(e)) => query_error_response(e),
        Err(e) => blocking_error_response(e),
    }
}

/// Forward a question to the insights service
async fn post_insights(
    data: web::Data<Arc<AppState>>,
    req: web::Json<InsightsRequest>,
) -> HttpResponse {
    match data.insights.ask(&req.question).await {
        Ok(result) => HttpResponse::Ok().json(InsightsResponse { result }),
        Err(InsightsError::NotConfigured) => {
            HttpResponse::ServiceUnavailable().json(MessageBody::new(InsightsError::NotConfigured.to_string()))
        }
        Err(e) => {
            log::error!("[INSIGHTS] {}", e);
            HttpResponse::BadGateway().json(MessageBody::new(INSIGHTS_UNAVAILABLE))
        }
    }
}

// ============================================================
// SERVER CONFIGURATION
// ============================================================

/// Reject malformed JSON bodies with the same `{ message }` shape as other errors
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(err, HttpResponse::BadRequest().json(MessageBody::new(message)))
            .into()
    })
}

/// Register every route. Shared by the server and the API tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .route("/reports", web::get().to(get_reports))
        .route("/reports/{year}", web::get().to(get_reports_for_year))
        .route("/insights", web::post().to(post_insights));
}

pub fn build_cors(origins: &CorsOrigins) -> Cors {
    let cors = match origins {
        CorsOrigins::Any => Cors::default().allow_any_origin(),
        CorsOrigins::List(list) => list
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin)),
    };

    cors.allowed_methods(["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .expose_headers(["Content-Length", "X-Kuma-Revision"])
        .max_age(600)
        .supports_credentials()
}

/// Configure and run the API server
pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let state = AppState::from_config(&config).map_err(std::io::Error::other)?;
    let state = Arc::new(state);

    log::info!("[CONFIG] Record source: {}", state.reports.source_description());
    log::info!(
        "[CONFIG] Insights: {}",
        if config.insights.is_some() { "enabled" } else { "disabled" }
    );
    log::info!("Salary Reports API starting at http://{}:{}", config.host, config.port);
    log::info!("   GET  /reports         - Yearly job count and average salary");
    log::info!("   GET  /reports/{{year}}  - Job-title counts for a year");
    log::info!("   POST /insights        - Ask the insights service");

    let cors_origins = config.cors_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&cors_origins))
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
