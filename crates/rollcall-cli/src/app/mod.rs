//! Application context and config resolution.

mod context;
mod resolver;

pub use context::AppContext;
pub use resolver::resolve_config_path;
