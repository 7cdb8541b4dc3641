//! Live price feed with reconnect, backoff, and synthetic fallback.
//!
//! ## Architecture
//!
//! - `book` - the price store (`PriceBook`) updates fold into
//! - `backoff` - the retry schedule for reconnection attempts
//! - `parser` - inbound transport message parsing
//! - `controller` - connection lifecycle state machine
//! - `simulator` - synthetic price generator for degraded mode

pub mod backoff;
pub mod book;
pub mod controller;
pub mod error;
pub mod parser;
pub mod simulator;

pub use backoff::*;
pub use book::*;
pub use controller::*;
pub use error::*;
pub use parser::*;
pub use simulator::*;
