pub mod attrs;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod header;
pub mod message;
pub mod util;
