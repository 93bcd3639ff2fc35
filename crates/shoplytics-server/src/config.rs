/// Environment parsing lives in `shoplytics-core`; the server only re-exports
/// it so handlers and tests can name `crate::config::Config`.
pub use shoplytics_core::config::Config;
