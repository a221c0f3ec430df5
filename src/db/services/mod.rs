//! SQL access for the three tables. Every function takes any SQLite executor,
//! so callers can run it against the pool or inside an open transaction.

pub mod client_service;
pub mod log_service;
pub mod token_service;

pub use client_service::*;
pub use log_service::*;
pub use token_service::*;
