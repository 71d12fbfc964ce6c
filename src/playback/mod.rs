pub mod scheduler;
pub mod session;
pub mod skip;
pub mod view;

pub use scheduler::{AiredPlacements, SchedulePoint, next_placement};
pub use session::{Directive, PlaybackSession, SessionMode, SessionSnapshot};
pub use skip::{SkipGate, SkipStatus};
pub use view::ViewTracker;
