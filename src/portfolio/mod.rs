//! Portfolio page logic.
//!
//! Everything here is independent of a rendering surface: animations advance
//! through [`Scheduler`] ticks and views draw the frames they are handed.

mod carousel;
mod contact;
mod particles;
mod reveal;
mod scheduler;
mod theme;
mod typing;

pub use carousel::*;
pub use contact::*;
pub use particles::*;
pub use reveal::*;
pub use scheduler::*;
pub use theme::*;
pub use typing::*;
