mod health;
mod keys;
mod metrics;
mod submissions;
mod submit;
mod tokens;

pub use health::*;
pub use keys::*;
pub use metrics::*;
pub use submissions::*;
pub use submit::*;
pub use tokens::*;
