//! Core data types for the pulseboard dashboard backend.

pub mod asset;
pub mod city;
pub mod favorite;
pub mod news;
pub mod notification;

pub use asset::*;
pub use city::*;
pub use favorite::*;
pub use news::*;
pub use notification::*;
