pub mod time_guard;
pub mod types;
