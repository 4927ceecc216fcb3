// ampere_sim/src/simulation/mod.rs

pub mod config;
pub mod io;
pub mod run;
