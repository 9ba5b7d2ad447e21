// Re-export `tracing` crate under own name to not collide and as convenient import
pub use tracing::{
    self, debug, error, event as trace, info, warn, Level as TraceLevel,
};
