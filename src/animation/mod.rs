//! Time-driven animation.
//!
//! A [`task::Task`] is advanced by a time delta and mutates scene properties; tasks compose with
//! [`task::all`] and [`task::sequence`]. [`timeline::Timeline`] drives tasks at a fixed frame rate.

/// Easing curves.
pub mod ease;
/// Tasks and their combinators.
pub mod task;
/// Fixed-rate playback.
pub mod timeline;
