pub mod command;
pub mod dirs;
pub mod env_var;
pub mod layout;
