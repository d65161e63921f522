pub use board::*;
pub use cell::*;
pub use error::*;
pub use field::*;
pub use generator::*;
pub use session::*;
pub use stats::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod field;
mod generator;
mod session;
mod stats;
mod types;
