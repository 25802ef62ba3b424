pub mod appointment;
pub mod auth;
pub mod chatbot;
pub mod directory;
pub mod emergency;
pub mod history;
