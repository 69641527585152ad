pub mod analytics;
pub mod auth;
pub mod core;
pub mod reports;
pub mod results;
pub mod roster;
pub mod voice;
