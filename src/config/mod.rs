pub mod env_bool;
pub mod switch_config;
