pub mod api;
pub mod app;
pub mod auth;
pub mod cascade;
pub mod config;
pub mod db;
pub mod fees;
pub mod forms;
pub mod listing;
pub mod mock;
pub mod model;
pub mod report;
pub mod screens;
pub mod source;
