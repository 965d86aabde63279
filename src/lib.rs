// ABOUTME: Library crate for skydeck exposing the lifecycle layer for the CLI and tests

#![allow(missing_docs)]

pub mod api;
pub mod cli;
pub mod config;
pub mod lifecycle;
pub mod models;
pub mod preview;
