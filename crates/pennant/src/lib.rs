#![doc = include_str!("../README.md")]

pub mod components;
pub mod config;
pub mod content;
pub mod date;
pub mod embed;
pub mod feed;
pub mod newsletter;
pub mod pagination;
pub mod permalink;
pub mod render;
pub mod routes;
mod site;
pub mod sitemap;
pub mod slug;
mod storage;
pub mod taxonomy;
pub mod templates;
pub mod theme;

pub use site::*;
pub use storage::*;
