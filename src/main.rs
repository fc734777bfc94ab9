mod api;
mod blockchain;
mod config;
mod error;
mod mining;
mod report;
mod transaction;
mod wallet;

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use log::{error, info};
use std::sync::Arc;

use api::AppState;
use blockchain::validate_chain;
use config::Config;
use mining::MiningOrchestrator;
use report::BlockReport;
use transaction::{DEMO_TRANSACTIONS, Ledger, TxPool};
use wallet::{FileRecordStore, KeyPair, KeySigner};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    env_logger::init();

    KeyPair::generate()
        .persist(&config.key_dir)
        .context("persisting keypair")?;
    let keys = KeyPair::load(&config.key_dir)?;
    let records = Arc::new(FileRecordStore::create(&config.record_path)?);
    let signer = Arc::new(KeySigner::new(keys.secret, records.clone()));

    let pool = Arc::new(TxPool::new(DEMO_TRANSACTIONS));
    let ledger = Arc::new(Ledger::seeded_from(pool.snapshot(), config.starting_balance));

    info!(
        "⛏️ Mining {} blocks with {} miners (difficulty {})",
        config.rounds, config.miners, config.initial_difficulty
    );
    let orchestrator =
        MiningOrchestrator::new(config.mining_settings(), ledger.clone(), pool.clone(), signer);
    let blockchain = orchestrator.run()?;

    let public_key = wallet::load_public_key(&config.key_dir)?;
    let validation = validate_chain(blockchain.blocks(), records.as_ref(), &public_key);
    if validation.is_valid() {
        for block in blockchain.blocks() {
            println!("\n{}", BlockReport(block));
        }
    } else {
        error!("{validation}");
    }

    if config.serve_api {
        let state = web::Data::new(AppState {
            blockchain,
            ledger,
            pool,
            validation,
        });
        serve(&config.host, config.port, state)?;
    }
    Ok(())
}

fn serve(host: &str, port: u16, state: web::Data<AppState>) -> std::io::Result<()> {
    println!("⛓️ Serving chain API at http://{host}:{port}");
    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .configure(api::init_routes)
        })
        .bind((host, port))?
        .run()
        .await
    })
}
