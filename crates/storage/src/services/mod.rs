pub mod pairing;
pub mod points;
pub mod ranking;
pub mod shooting;
pub mod standings;
pub mod timing;
