pub mod catalog;
pub mod daily;
pub mod errors;
pub mod filters;
pub mod level;
pub mod models;
pub mod prefs;
pub mod progress;
pub mod quiz;
pub mod stats;
pub mod translate;
pub mod unlock;

pub use catalog::*;
pub use daily::*;
pub use errors::*;
pub use filters::*;
pub use level::*;
pub use models::*;
pub use prefs::*;
pub use progress::*;
pub use quiz::*;
pub use stats::*;
pub use translate::*;
pub use unlock::*;
