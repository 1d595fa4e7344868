//! Library exports for assignmentpro, shared between the binary and tests.

pub mod api;
pub mod config;
pub mod models;
pub mod pages;
pub mod routes;
pub mod session;
pub mod startup;
pub mod state;
pub mod storage;
pub mod theme;
pub mod utils;
