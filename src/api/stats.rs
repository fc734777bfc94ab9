use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let bc = &state.blockchain;
    HttpResponse::Ok().json(StatsResponse {
        height: bc.len(),
        difficulty: bc.difficulty(),
        avg_mining_ms: bc.average_mining_ms(),
        applied_transactions: bc.blocks().iter().map(|b| b.payload.len()).sum(),
        pending_transactions: state.pool.len(),
        participants: state.ledger.len(),
    })
}
