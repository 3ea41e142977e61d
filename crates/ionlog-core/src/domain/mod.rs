//! Domain types shared by every layer

mod caller;
mod level;
mod record;

pub use caller::CallerInfo;
pub use level::Level;
pub use record::LogRecord;
