//! Bilingual (French/English) newsletter viewer backed by the `editions`
//! worksheet of a Google Sheets document.

pub mod auth;
pub mod cache;
pub mod config;
pub mod edition;
pub mod error;
pub mod export;
pub mod html;
pub mod i18n;
pub mod render;
pub mod repository;
pub mod server;
pub mod sheets;
