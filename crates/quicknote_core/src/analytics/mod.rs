//! Text analytics over note bodies.
//!
//! Pure CPU work; nothing here touches storage.

pub mod word_frequency;
