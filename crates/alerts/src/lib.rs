//! Notification feed and probabilistic alert timers.
//!
//! - `sink` - capped, newest-first notification list with change broadcast
//! - `timer` - periodic probabilistic alert generator
//! - `compose` - randomized alert text builders

pub mod compose;
pub mod sink;
pub mod timer;

pub use compose::*;
pub use sink::*;
pub use timer::*;
