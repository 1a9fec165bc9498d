//! Adapter implementations of the port traits.
//!
//! `live` talks to the repository and the chat providers, `recording`
//! wraps a live adapter and captures its traffic into a cassette, and
//! `replaying` serves that traffic back.

pub mod live;
pub mod recording;
pub mod replaying;
