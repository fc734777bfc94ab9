use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, ChainResponse, ValidateResponse};

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = &state.blockchain;
    HttpResponse::Ok().json(ChainResponse {
        length: bc.len(),
        difficulty: bc.difficulty(),
        chain: bc.blocks(),
    })
}

/// Outcome of the post-mining validation, check by check.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ValidateResponse {
        valid: state.validation.is_valid(),
        length: state.blockchain.len(),
        checks: state.validation,
    })
}
