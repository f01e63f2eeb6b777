//! Data shapes shared between the label server and its clients.

pub mod model;
pub mod requests;
