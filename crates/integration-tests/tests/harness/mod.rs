//! Shared test harness: config builder, scripted provider, test server
#![allow(dead_code)]

pub mod config;
pub mod mock_provider;
pub mod server;
