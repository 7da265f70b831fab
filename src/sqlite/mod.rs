// SQLite backend - embedded database files opened through rusqlite
//
// - connection: the owned connection and the blocking-pool bridge
// - params: conversion from handle parameters to rusqlite values
// - query: statement execution and row extraction

pub mod connection;
pub mod params;
pub mod query;

pub use connection::SqliteConnection;
pub use params::SqliteParams;
