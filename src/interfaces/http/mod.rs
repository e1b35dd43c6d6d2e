use crate::application::use_cases::batch_processor::BatchProcessor;
use crate::application::use_cases::upload_ingestion::UploadIngestionUseCase;
use crate::domain::error::{AppError, Result};
use crate::domain::record::ClassifiedRecord;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::export::CsvExporter;
use actix_cors::Cors;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{
    dev::Server, get, post, web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub ingestion: Arc<UploadIngestionUseCase>,
    pub include_status: bool,
    pub max_upload_bytes: u64,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl HttpState {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mapper = Arc::new(config.build_mapper()?);
        let ingestion = UploadIngestionUseCase::new(
            BatchProcessor::new(mapper),
            config.server.max_upload_bytes,
        );

        Ok(Self {
            ingestion: Arc::new(ingestion),
            include_status: config.export.include_status,
            max_upload_bytes: config.server.max_upload_bytes,
            logs: Arc::new(Mutex::new(Vec::new())),
        })
    }
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    #[serde(default)]
    pub include_status: Option<bool>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
        AppError::DecodeError(_) | AppError::ParseError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_body(err: &AppError) -> HttpResponse {
    HttpResponse::build(status_for(err)).json(ErrorBody {
        error: err.to_string(),
    })
}

fn error_response(logs: &Mutex<Vec<LogEntry>>, source: &str, err: AppError) -> HttpResponse {
    let level = if status_for(&err).is_server_error() { "ERROR" } else { "WARN" };
    add_log(logs, level, source, &err.to_string());
    error_body(&err)
}

/// Malformed JSON bodies surface as `ParseError` with the usual error shape
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let parse_error = AppError::ParseError(err.to_string());
    let response = error_body(&parse_error);
    InternalError::from_response(err, response).into()
}

#[post("/upload")]
async fn upload(
    data: web::Data<HttpState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> impl Responder {
    let file_name = query.into_inner().filename;
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Upload received: {} ({} bytes)", file_name, body.len()),
    );

    let ingestion = data.ingestion.clone();
    let name = file_name.clone();
    let result = web::block(move || ingestion.execute(&name, &body)).await;

    match result {
        Ok(Ok(summary)) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!(
                    "Processed {}: {} records, {} duplicates removed, {} skipped",
                    file_name,
                    summary.record_count,
                    summary.dedup_count,
                    summary.skipped.len()
                ),
            );
            HttpResponse::Ok().json(summary)
        }
        Ok(Err(e)) => error_response(&data.logs, "HttpApi", e),
        Err(e) => error_response(&data.logs, "HttpApi", AppError::Internal(e.to_string())),
    }
}

#[post("/export")]
async fn export(
    data: web::Data<HttpState>,
    query: web::Query<ExportQuery>,
    req: web::Json<Vec<ClassifiedRecord>>,
) -> impl Responder {
    let include_status = query.include_status.unwrap_or(data.include_status);
    let exporter = CsvExporter::new().with_status(include_status);

    match exporter.export(&req) {
        Ok(bytes) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!("Exported {} records", req.len()),
            );
            HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    "Content-Disposition",
                    "attachment; filename=\"cleaned_data.csv\"",
                ))
                .body(bytes)
        }
        Err(e) => error_response(&data.logs, "HttpApi", e),
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    match data.logs.lock() {
        Ok(logs) => HttpResponse::Ok().json(&*logs),
        Err(_) => HttpResponse::InternalServerError().json(ErrorBody {
            error: "log buffer unavailable".to_string(),
        }),
    }
}

/// Routes plus the extractor limits sized from the configured upload cap
pub fn configure(state: web::Data<HttpState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let limit = usize::try_from(state.max_upload_bytes).unwrap_or(usize::MAX);

        cfg.app_data(state)
            .app_data(web::PayloadConfig::new(limit))
            .app_data(
                web::JsonConfig::default()
                    .limit(limit)
                    .error_handler(json_error_handler),
            )
            .service(
                web::scope("/api")
                    .service(upload)
                    .service(export)
                    .service(health)
                    .service(get_logs),
            );
    }
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }

    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    if let Ok(mut logs) = logs.lock() {
        logs.push(entry.clone());
        if logs.len() > MAX_LOG_ENTRIES {
            logs.remove(0);
        }
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn start_server(state: HttpState, bind: (String, u16)) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new().wrap(cors).configure(configure(state.clone()))
    })
    .bind(bind)?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    fn state() -> web::Data<HttpState> {
        web::Data::new(HttpState::from_config(&AppConfig::default()).unwrap())
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(configure(state()))).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_upload_csv() {
        let app = test::init_service(App::new().configure(configure(state()))).await;
        let req = test::TestRequest::post()
            .uri("/api/upload?filename=people.csv")
            .set_payload("Full Name,Mobile,DOB\njohn o'brien,555-12-34,2020/1/5\n")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["recordCount"], 1);
        assert_eq!(body["filesProcessed"], 1);
        assert_eq!(body["missingCount"], 1);
        assert_eq!(body["data"][0]["FULL NAME"], "John Obrien");
        assert_eq!(body["data"][0]["CONTACT"], "5551234");
        assert_eq!(body["data"][0]["DATE"], "2020-01-05");
        assert_eq!(body["data"][0]["status"], "MISSING_FIELDS");
    }

    #[actix_web::test]
    async fn test_upload_rejections() {
        let app = test::init_service(App::new().configure(configure(state()))).await;

        let req = test::TestRequest::post()
            .uri("/api/upload?filename=notes.docx")
            .set_payload("hello")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("notes.docx"));

        let req = test::TestRequest::post()
            .uri("/api/upload?filename=empty.csv")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_export_csv() {
        let app = test::init_service(App::new().configure(configure(state()))).await;
        let records = serde_json::json!([{
            "DATE": "2020-01-05",
            "FULL NAME": "Ann Lee",
            "CONTACT": "5551234",
            "ADDRESS": "1 Main St",
            "status": "VALID"
        }]);

        let req = test::TestRequest::post()
            .uri("/api/export?includeStatus=true")
            .set_json(&records)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp
            .headers()
            .get("Content-Disposition")
            .is_some());

        let body = test::read_body(resp).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("DATE,FULL NAME,CONTACT,ADDRESS,STATUS"));
        assert_eq!(lines.next(), Some("2020-01-05,Ann Lee,5551234,1 Main St,VALID"));
    }

    #[actix_web::test]
    async fn test_malformed_export_body_is_parse_error() {
        let app = test::init_service(App::new().configure(configure(state()))).await;
        let req = test::TestRequest::post()
            .uri("/api/export")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("[{\"DATE\": ")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Parse error"));
    }

    #[actix_web::test]
    async fn test_logs_ring_buffer() {
        let state = state();
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            add_log(&state.logs, "INFO", "Test", &format!("entry {}", i));
        }

        let app = test::init_service(App::new().configure(configure(state.clone()))).await;
        let req = test::TestRequest::get().uri("/api/logs").to_request();
        let logs: Vec<LogEntry> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].message, "entry 5");
    }
}
