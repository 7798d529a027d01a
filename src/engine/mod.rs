pub mod balance;
pub mod efficiency;
pub mod settlement;
