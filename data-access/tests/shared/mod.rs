pub mod entities;
pub mod memory;
pub mod setup;
