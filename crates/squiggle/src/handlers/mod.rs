pub mod error;
pub mod health;
pub mod plays;

pub use error::AppError;
