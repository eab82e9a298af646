pub mod display;
pub mod install;
pub mod remove;
