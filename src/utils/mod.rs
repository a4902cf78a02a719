#[cfg(test)]
mod http_stub;
mod listing;

#[cfg(test)]
pub(crate) use http_stub::{closed_url, serve_once};
pub use listing::enumerate_values;
