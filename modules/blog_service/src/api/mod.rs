//! API layer - REST and native clients

pub mod native;
pub mod rest;
