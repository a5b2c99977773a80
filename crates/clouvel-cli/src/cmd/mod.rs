pub mod config;
pub mod docs;
pub mod hook;
pub mod mcp;
pub mod planning;
pub mod shovel;
