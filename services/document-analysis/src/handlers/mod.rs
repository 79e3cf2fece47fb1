pub mod analysis;
pub mod documents;
pub mod health;

pub use analysis::*;
pub use documents::*;
pub use health::*;
