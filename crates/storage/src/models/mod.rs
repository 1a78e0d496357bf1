mod competitor;
mod event;
mod race;

pub use competitor::Competitor;
pub use event::{Discipline, Event, EventStatus};
pub use race::{Race, SplitTimes};
