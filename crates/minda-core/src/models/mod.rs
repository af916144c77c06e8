pub mod chat;
pub mod insight;
pub mod knowledge;
pub mod language;
pub mod risk;
pub mod score;
pub mod token_count;
