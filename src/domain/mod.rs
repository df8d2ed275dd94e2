//! Domain models and types for Redactor.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Geometry** ([`Point`], [`Quad`]) in image pixel coordinates
//! - **OCR output** ([`TextLine`])
//! - **Categories** ([`Category`], [`CategorySet`])
//! - **Error types** ([`RedactorError`], [`ServiceError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, RedactorError>`]:
//!
//! ```rust
//! use redactor::domain::{RedactorError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = redactor::config::load_config("redactor.toml")?;
//!     Ok(())
//! }
//! ```

pub mod category;
pub mod errors;
pub mod geometry;
pub mod result;
pub mod text_line;

pub use category::{format_label, Category, CategorySet};
pub use errors::{RedactorError, ServiceError};
pub use geometry::{Point, Quad};
pub use result::Result;
pub use text_line::TextLine;
