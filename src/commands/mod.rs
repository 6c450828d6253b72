pub mod extract;
pub mod status;
