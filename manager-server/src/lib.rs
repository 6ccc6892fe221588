//! manager-server: departments, employees and user profiles behind a
//! bearer-token HTTP API, with image uploads to object storage.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repo;
pub mod state;
pub mod storage;
