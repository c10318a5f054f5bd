// src/lib.rs

pub mod config;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod score;
pub mod usn;

pub use config::Config;
pub use error::{ErrorKind, ResultError};
pub use fetch::ResultFetcher;
pub use record::{StudentRecord, SubjectGrade};
pub use report::Report;
pub use score::Sgpa;
pub use usn::Usn;
