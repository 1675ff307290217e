//! Route Handlers

pub mod demo;
pub mod predict;
