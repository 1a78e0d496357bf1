pub mod competitor;
pub mod event;
pub mod race;
pub mod standings;
