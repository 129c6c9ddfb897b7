pub mod policies;
pub mod records;
pub mod state;
