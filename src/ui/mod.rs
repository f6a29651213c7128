mod prompt;
pub use prompt::*;

mod reporter;
pub use reporter::*;

mod summary;
pub use summary::*;
