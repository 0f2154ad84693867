//! A searchable, paginated media tray backed by the Klipy API.
//!
//! [`controller::TrayController`] owns the tray state, resolves which feed
//! to show via [`resolver`], and talks to a [`media_api::MediaApi`]
//! implementation such as [`klipy::Klipy`].

pub mod action;
pub mod config;
pub mod controller;
pub mod customer_id;
pub mod error;
pub mod klipy;
pub mod media_api;
pub mod resolver;
pub mod tray;
pub mod types;

pub use controller::{FetchContext, TrayController};
pub use error::{ApiError, Result};
pub use media_api::MediaApi;
