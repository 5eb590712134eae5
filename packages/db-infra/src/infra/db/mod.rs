pub mod core;

pub use self::core::{close, connect};
