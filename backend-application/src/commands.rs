pub mod gate_token_commands;
pub mod stock_commands;
pub mod visit_commands;
