pub mod term;
pub mod category;
pub mod project;
pub mod template;
pub mod workspace;
pub mod config;

pub use term::*;
pub use category::*;
pub use project::*;
pub use template::*;
pub use workspace::*;
pub use config::*;
