//! Session layer for the gallery.
//!
//! A [`GallerySession`] owns one user's filter, page counter and current
//! result. [`GalleryService`] runs a session on a tokio task, debouncing
//! typed queries and publishing results on a watch channel.

pub mod config;
pub mod debounce;
pub mod service;
pub mod session;

pub use config::GalleryConfig;
pub use debounce::debounce;
pub use service::{GalleryEvent, GalleryHandle, GalleryService, GallerySnapshot};
pub use session::{GallerySession, LoadTicket, ScrollPosition, SessionStats};
