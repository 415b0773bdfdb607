pub mod action;
pub mod config;
