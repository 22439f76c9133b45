mod payload;
mod record;

pub use payload::*;
pub use record::*;
