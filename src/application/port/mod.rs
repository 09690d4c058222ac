// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! The core modules (cache, sync, navigation) talk to the outside world only
//! through these traits; [`crate::infrastructure`] provides the concrete
//! adapters, and tests substitute in-memory fakes.
//!
//! # Available Ports
//!
//! - [`http`]: HTTP GET with timeout, to text or to a file
//! - [`image`]: Decode an image file to RGBA
//! - [`background`]: Apply a composed canvas as the desktop background
//!
//! # Design Notes
//!
//! - All traits use domain types only (no `reqwest` or `image` types)
//! - Traits are `Send + Sync` so the navigation engine can be shared
//! - The HTTP port is async; decoding and applying are blocking calls

pub mod background;
pub mod http;
pub mod image;

pub use background::BackgroundApplier;
pub use http::HttpClient;
pub use image::ImageDecoder;
