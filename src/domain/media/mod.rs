// SPDX-License-Identifier: MPL-2.0
//! Media domain types shared by the catalog, capture flow and playback core.

mod types;

pub use types::{MediaItem, MediaType, MediaUri};
