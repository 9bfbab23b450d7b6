pub mod chat_message;
pub mod leaderboard;
pub mod mood;
pub mod weekly_summary;
