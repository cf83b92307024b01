// SPDX-License-Identifier: MPL-2.0
//! Domain layer: pure data types with no platform dependencies.

pub mod media;

pub use media::{MediaItem, MediaType, MediaUri};
