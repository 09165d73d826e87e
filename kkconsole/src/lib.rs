//! Command-line front end for the KubeKey console

pub mod inventory;
pub mod render;
pub mod runner;
