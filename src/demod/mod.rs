pub mod carrier;
pub mod config;
pub mod decision;
pub mod probe;
pub mod stream;
pub mod sync;

pub use config::*;
pub use probe::*;
pub use stream::*;
pub use sync::*;
