pub mod aggregator;
pub mod gateway;
pub mod leaderboard;
pub mod mirror;
pub mod overview;
pub mod prediction;
pub mod render;
pub mod session_store;
pub mod trend;
