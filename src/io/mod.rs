pub mod config_io;
pub mod lock;
pub mod prompt_log;
pub mod session;
pub mod store;
pub mod uploads;
