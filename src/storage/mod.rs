pub mod sqlite;

pub use sqlite::SqliteCache;
