mod interface;
mod lazy;
mod pool;
mod shard;
mod sharded;
#[cfg(test)]
mod tests;
mod v4;
mod worker;

pub use interface::*;
pub use lazy::*;
pub use pool::*;
pub use shard::*;
pub use sharded::*;
pub use v4::*;
pub use worker::*;
