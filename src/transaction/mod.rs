pub mod ledger;
pub mod model;
pub mod pool;

pub use ledger::Ledger;
pub use model::Transfer;
pub use pool::TxPool;

/// Balance every participant starts with.
pub const STARTING_BALANCE: i64 = 100;

/// Pending transfers loaded into the pool at startup.
pub const DEMO_TRANSACTIONS: [&str; 16] = [
    "miner2 sent 30 VC to miner1",
    "miner2 sent 30 VC to miner3",
    "miner2 sent 30 VC to Nick",
    "miner2 sent 10 VC to Bob",
    "miner1 sent 10 VC to Alice",
    "Nick sent 1 VC to ShoesShop",
    "Nick sent 2 VC to FastFood",
    "Nick sent 15 VC to CarShop",
    "miner1 sent 90 VC to CarShop",
    "CarShop sent 10 VC to Worker1",
    "CarShop sent 10 VC to Worker2",
    "CarShop sent 10 VC to Worker3",
    "CarShop sent 30 VC to Director1",
    "CarShop sent 45 VC to CarPartsShop",
    "Bob sent 5 VC to GamingShop",
    "Alice sent 5 VC to BeautyShop",
];
