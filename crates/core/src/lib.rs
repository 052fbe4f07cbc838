#![forbid(unsafe_code)]

//! Pure domain logic for the course navigator: catalog model, deterministic
//! option shuffle, progress state machine, and unlock policy. No I/O here;
//! persistence lives in the `storage` crate.

pub mod model;
pub mod policy;
pub mod shuffle;
pub mod time;

pub use policy::{ModuleAccess, can_advance, is_unlocked, module_access};
pub use shuffle::{OptionOrder, ShuffledActivity};
pub use time::Clock;
