pub mod cli;
pub mod predict;
