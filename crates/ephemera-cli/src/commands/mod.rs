//! Command implementations.

pub mod delete;
pub mod mark;
pub mod order;
pub mod quote;
pub mod settings;
pub mod stats;
pub mod sweep;
pub mod watch;

pub use self::delete::execute_delete;
pub use self::mark::execute_mark;
pub use self::order::execute_order;
pub use self::quote::execute_quote;
pub use self::settings::execute_settings;
pub use self::stats::execute_stats;
pub use self::sweep::execute_sweep;
pub use self::watch::execute_watch;
