// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! - [`ffmpeg`]: Probing and frame grabbing via `FFmpeg` (implements [`FrameSource`])
//!
//! [`FrameSource`]: crate::application::port::FrameSource

pub mod ffmpeg;

pub use ffmpeg::{init_ffmpeg, FfmpegFrameSource};
