// Domain value objects
pub mod cargo_type;
pub mod identifiers;
pub mod visit_status;

pub use cargo_type::*;
pub use identifiers::*;
pub use visit_status::*;
