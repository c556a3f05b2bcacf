mod cached_clock;
mod interface;
mod system_clock;

pub use cached_clock::*;
pub use interface::*;
pub use system_clock::*;
