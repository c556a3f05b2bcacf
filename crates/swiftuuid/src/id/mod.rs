mod layout;
mod uuid;

pub use self::layout::*;
pub use self::uuid::*;
