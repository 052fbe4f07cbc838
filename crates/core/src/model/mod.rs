mod catalog;
mod ids;
mod module;
mod progress;

pub use catalog::{Catalog, CatalogError, Phase};
pub use ids::{ModuleId, ParseIdError, PhaseId};
pub use module::{Activity, ActivityError, Module};
pub use progress::{AnswerOutcome, Progress, ProgressError, COMPLETION_REWARD, REVIEW_REWARD};
