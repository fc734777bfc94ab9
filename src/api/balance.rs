use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, BalanceResponse, LedgerResponse};

#[get("/ledger/")]
pub async fn get_ledger(state: web::Data<AppState>) -> impl Responder {
    let balances = state.ledger.snapshot();
    HttpResponse::Ok().json(LedgerResponse {
        participants: balances.len(),
        total: balances.values().sum(),
        balances,
    })
}

#[get("/balance/{participant}/")]
pub async fn get_balance(state: web::Data<AppState>, path: web::Path<(String,)>) -> impl Responder {
    let participant = path.into_inner().0;
    match state.ledger.balance(&participant) {
        Some(balance) => HttpResponse::Ok().json(BalanceResponse {
            participant,
            balance,
        }),
        None => HttpResponse::NotFound().body(format!("unknown participant {participant}")),
    }
}
