pub mod assessments;
pub mod chat;
pub mod health;
pub mod insights;
pub mod instruments;
pub mod triage;
