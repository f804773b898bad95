pub mod config;
pub mod dashboard;
pub mod run;
pub mod sample;
pub mod show;
