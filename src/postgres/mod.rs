// PostgreSQL backend - a single tokio-postgres client per handle
//
// - connection: connecting from a descriptor and running statements
// - params: binding handle values to server parameter types
// - query: row extraction and cursor building

pub mod connection;
pub mod params;
pub mod query;

pub use connection::PostgresConnection;
