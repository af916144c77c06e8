pub mod gad7;
pub mod k6;
pub mod phq9;
