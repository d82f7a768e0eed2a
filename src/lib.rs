// src/lib.rs

//! sanad Content Access Library

pub mod error;
pub mod models;
pub mod reconcile;
pub mod remote;
pub mod router;
pub mod store;
