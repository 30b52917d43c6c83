//! Command line front end

pub mod recommend;
pub mod setup;
pub mod ui;
