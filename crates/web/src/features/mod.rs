pub mod competitors;
pub mod events;
pub mod races;
pub mod standings;
