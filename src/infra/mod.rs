pub mod claude;
pub mod notification;
pub mod pushover;
pub mod transcript;
