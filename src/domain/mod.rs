mod cell;
mod classifier;
mod document;
mod statement;
mod taxonomy;

pub use cell::*;
pub use classifier::*;
pub use document::*;
pub use statement::*;
pub use taxonomy::*;
