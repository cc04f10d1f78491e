// Domain services

pub mod duration;
pub mod stock_ledger;

pub use duration::*;
pub use stock_ledger::*;
