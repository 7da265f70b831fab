mod cursor;
mod row;

pub use cursor::{Cursor, FetchedRow};
pub use row::{ColumnIndex, Row};
