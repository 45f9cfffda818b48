//! Nodedock CLI - operator front end for the worker node fleet.

pub mod commands;
pub mod menu;
pub mod output;
