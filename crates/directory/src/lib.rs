//! In-memory users, shelters and reports.
//!
//! Backs the bot when no external persistence service is wired in. Shelters
//! and volunteers are seeded at startup; visitors and reports are created as
//! conversations happen and are lost on restart.

pub mod memory;
pub mod validate;

pub use memory::InMemoryDirectory;
