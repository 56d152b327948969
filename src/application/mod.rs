// SPDX-License-Identifier: MPL-2.0
//! Application layer.
//!
//! - [`port`]: Trait definitions that infrastructure adapters implement
//!
//! The thumbnail pipeline and the session only talk to media decoding through
//! these ports, so tests can substitute scripted sources for `FFmpeg`.

pub mod port;
