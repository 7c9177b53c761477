// src/driver/mod.rs

// Declare the sub-module
pub mod sync_driver;

// Re-export the public driver struct
pub use sync_driver::PhEzo;

// Async wrapping, if an application wants it, belongs around the blocking
// driver (e.g. a task that owns the handle), not inside it.
