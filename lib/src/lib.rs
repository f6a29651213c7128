mod crew;
mod fs;
mod names;
mod path;
mod pool;
mod report;
mod sweep;

pub use crew::*;
pub use fs::*;
pub use names::*;
pub use path::*;
pub use pool::*;
pub use report::*;
pub use sweep::*;
