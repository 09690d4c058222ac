// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`http`]: HTTP over `reqwest` (implements [`HttpClient`])
//! - [`decoder`]: Decoding via the `image` crate (implements [`ImageDecoder`])
//! - [`applier`]: BMP output plus optional command (implements [`BackgroundApplier`])
//!
//! [`HttpClient`]: crate::application::port::HttpClient
//! [`ImageDecoder`]: crate::application::port::ImageDecoder
//! [`BackgroundApplier`]: crate::application::port::BackgroundApplier

pub mod applier;
pub mod decoder;
pub mod http;

pub use applier::BitmapApplier;
pub use decoder::ImageRsDecoder;
pub use http::ReqwestHttpClient;
