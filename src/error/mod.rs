mod app;
mod config;
mod figure;
mod ingest;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use figure::FigureError;
pub use ingest::IngestError;
pub use validation::ValidationError;
