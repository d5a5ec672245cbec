pub mod load;
pub mod types;

pub use load::{LOG_DIR_ENV, MAX_DURATION_ENV};
pub use types::{
    Config, DEFAULT_LOG_DIRECTORY, DEFAULT_MAX_DURATION_SECONDS, FileTypeTable, RunDefaults,
};
