pub mod api;
pub mod boot;
pub mod branding;
pub mod config;
pub mod db;
pub mod install;
pub mod manifest;
pub mod models;
