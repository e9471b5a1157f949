//! Markdown formatting for models and operation results.
//!
//! Domain models implement `Display` directly in [`models`]; collections and
//! navigator results get wrapper types or their own impls in
//! [`collections`] and [`results`]. Every formatter writes markdown, which
//! the CLI renders with termimad and the MCP server returns as text.
//!
//! ```rust
//! use pathwise_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Moved to week 4 of 12");
//! assert_eq!(status.to_string(), "Success: Moved to week 4 of 12\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{LifeEvents, RoadmapHistory, Tasks};
pub use datetime::{LocalDate, LocalDateTime};
pub use results::CreateResult;
pub use status::OperationStatus;
