//! Lua-script plumbing behind `RedisStore`.

pub mod commands;
pub mod executor;
pub mod scripts;

pub use executor::ScriptExecutor;
