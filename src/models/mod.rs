pub mod admission;
pub mod enums;
pub mod room;

pub use admission::*;
pub use enums::*;
pub use room::*;
