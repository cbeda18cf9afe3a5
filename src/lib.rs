//! `ridge-ols` library crate.
//!
//! The binary (`linregress`) is a thin wrapper around this library so that:
//!
//! - the least-squares core is testable without spawning processes
//! - the model can be embedded directly (`models::RidgeRegression`)
//! - CSV glue, reports, and plotting stay out of the numerical code

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
