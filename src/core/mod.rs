pub mod alphabet;
pub mod codec;
pub mod compare;
pub mod engine;
pub mod error;
pub mod io;
pub mod profile;
pub mod record;
pub mod score;
pub mod stats;
pub mod windows;
