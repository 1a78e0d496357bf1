pub mod competitor;
pub mod event;
pub mod race;

pub use competitor::CompetitorRepository;
pub use event::EventRepository;
pub use race::RaceRepository;
