pub mod ops_handlers;
pub mod stock_handlers;
pub mod visit_handlers;

pub use ops_handlers::*;
pub use stock_handlers::*;
pub use visit_handlers::*;
