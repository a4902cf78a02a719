mod endpoint;
mod executor;
mod introspection;

pub use endpoint::{GraphEndpoint, HttpGraphEndpoint, MockGraphEndpoint};
pub use executor::{ExecutedQuery, QueryExecutor};
pub use introspection::SchemaIntrospector;
