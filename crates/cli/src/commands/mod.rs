pub mod config;
pub mod fetch;
pub mod import;

pub use config::handle_config_command;
pub use fetch::handle_fetch_command;
pub use import::handle_import_command;

use crosspost_engine::ReqwestTransport;

use crate::config::Config;

/// The HTTP transport, carrying the configured session for logged in fetches.
pub(crate) fn transport(config: &Config) -> ReqwestTransport {
    match &config.session_cookie {
        Some(cookie) => ReqwestTransport::new().with_session_cookie(cookie.as_str()),
        None => ReqwestTransport::new(),
    }
}
