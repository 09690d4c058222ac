// SPDX-License-Identifier: MPL-2.0
//! `wallswap` rotates the desktop wallpaper through a local list of images or
//! an online list synchronized from a wallpaper repository.
//!
//! The pieces are layered the usual way: [`catalog`] holds the ordered
//! lists, [`cache`] materializes remote images, [`compositor`] renders a
//! wallpaper onto a screen-sized canvas, [`sync`] mirrors the repository
//! database and [`navigation`] ties them together into next / previous /
//! current operations with automatic removal of broken entries.

#![doc(html_root_url = "https://docs.rs/wallswap/0.1.0")]

pub mod app;
pub mod application;
pub mod cache;
pub mod catalog;
pub mod compositor;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod navigation;
pub mod sync;

#[cfg(test)]
mod test_utils;
