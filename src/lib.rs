pub mod activity;
pub mod cli;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod execution;
pub mod feed;
pub mod tui;
