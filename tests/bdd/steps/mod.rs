pub mod cli_steps;
pub mod stub_api;
