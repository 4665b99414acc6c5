//! Input detection, reading, and address-column discovery.

mod reader;
mod resolve;
mod source;

pub use reader::{ReaderConfig, Row, RowStream, TabularReader, TabularSource};
pub use resolve::{ADDRESS_COLUMN, locate_address_column, normalize_header};
pub use source::{InputKind, SourceMetadata};
