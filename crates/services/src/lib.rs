#![forbid(unsafe_code)]

pub mod autosave;
pub mod course_service;
pub mod error;
pub mod review_service;

pub use course_core::Clock;

pub use autosave::{Autosaver, DEFAULT_AUTOSAVE_DELAY};
pub use course_service::CourseService;
pub use error::CourseError;
pub use review_service::{ReviewOutcome, ReviewService};
