mod interface;
mod os_entropy;
mod thread_entropy;

pub use interface::*;
pub use os_entropy::*;
pub use thread_entropy::*;
