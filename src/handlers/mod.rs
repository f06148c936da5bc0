mod analytics;
mod client;
mod short_url;

pub use analytics::{redirect_count_handler, short_url_count_handler};
pub use client::client_ip;
pub use short_url::{resolve_handler, shorten_handler};
