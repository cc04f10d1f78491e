pub mod alert_service;
pub mod report_service;

pub use alert_service::*;
pub use report_service::*;
