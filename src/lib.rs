
pub mod cost;
pub mod data;
pub mod io;
pub mod miner;
pub mod pattern;
pub mod state;

pub use data::{Count, Item, Transaction, TransactionStore, TrId};
pub use pattern::{Pattern, PatternCollection};
pub use state::SearchState;
pub use miner::{mine, MiningConfig, PandaMiner};
