/// Interfaces Layer - External Entry Points
///
/// ## Modules
/// - `cli`: command-line simulator (main.rs logic)
/// - `tools`: utility tools (synthetic order flow)

pub mod cli;
pub mod tools;
