use crate::error::{CensorError, Result};
use actix_middleware::CorrelationContext;
use actix_web::{web, HttpResponse};
use content_policy::{BannedTerms, Verdict};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CensorRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CensorResponse {
    pub status: String,
}

/// POST /censor
pub async fn censor(
    ctx: CorrelationContext,
    terms: web::Data<BannedTerms>,
    body: web::Json<CensorRequest>,
) -> Result<HttpResponse> {
    match terms.check(&body.text) {
        Verdict::Clean => Ok(HttpResponse::Ok().json(CensorResponse {
            status: "ok".to_string(),
        })),
        Verdict::Banned(term) => {
            tracing::info!(
                request_id = %ctx.request_id(),
                term = %term,
                "Rejected text containing banned term"
            );
            Err(CensorError::Inappropriate)
        }
    }
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(serde_json::json!({
        "error": "Method not allowed",
        "status": 405,
    }))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
