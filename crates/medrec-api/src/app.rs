use axum::{
    extract::Multipart,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error};

use medrec_core::{load_inventory, ReportBuilder, ReportRow};

/// Upper bound on report rows echoed back in the upload response.
pub const RESPONSE_ROW_LIMIT: usize = 10;

pub fn build_app() -> Router {
    Router::new().route("/", get(status).post(upload))
}

/// Fixed service descriptor; does not touch the report builder.
async fn status() -> impl IntoResponse {
    Json(json!({
        "service": "Med to Rec Report",
        "status": "active",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    status: &'static str,
    timestamp: String,
    records_found: usize,
    data: Vec<ReportRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_units: Option<i64>,
}

/// Accept a delimited inventory export as a multipart `file` field and return
/// the unformatted report: row count, the first few rows, and total units.
async fn upload(mut multipart: Multipart) -> axum::response::Response {
    let mut payload: Option<Vec<u8>> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => match field.bytes().await {
                Ok(bytes) => {
                    payload = Some(bytes.to_vec());
                    break;
                }
                Err(err) => {
                    return json_error(
                        StatusCode::BAD_REQUEST,
                        format!("failed to read upload: {err}"),
                    )
                }
            },
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(err) => {
                return json_error(
                    StatusCode::BAD_REQUEST,
                    format!("malformed multipart request: {err}"),
                )
            }
        }
    }
    let Some(payload) = payload else {
        return json_error(StatusCode::BAD_REQUEST, "No file provided");
    };

    let records = match load_inventory(payload.as_slice()) {
        Ok(records) => records,
        Err(err) => {
            error!(error = %err, "report generation failed");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string());
        }
    };

    let report = ReportBuilder::new().build(&records);
    let records_found = report.len();
    let total_units = (!report.is_empty()).then(|| report.total_units());
    debug!(records_found, "upload report built");

    let mut data = report.rows;
    data.truncate(RESPONSE_ROW_LIMIT);

    Json(UploadResponse {
        status: "success",
        timestamp: Utc::now().to_rfc3339(),
        records_found,
        data,
        total_units,
    })
    .into_response()
}

fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}
