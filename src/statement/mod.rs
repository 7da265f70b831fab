//! SQL text generation: literal quoting and the INSERT / REPLACE / UPDATE builders.
//!
//! Only values are quoted. Table names and update conditions are embedded verbatim and
//! must come from trusted code.

mod builders;
mod quote;

pub use builders::{make_insert, make_replace, make_update};
pub use quote::{quote_str, quote_value};
pub(crate) use quote::TIMESTAMP_FORMAT;
