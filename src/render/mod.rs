//! Invoice presentation: the printable view-model and PDF output.

mod format;
mod pdf;
mod view;

pub use format::*;
pub use pdf::*;
pub use view::*;
