pub mod doctor;
pub mod hook;
pub mod install;
pub mod test_push;
