pub mod dictionary;
pub mod quiz;
pub mod stats;
pub mod users;
pub mod vocabulary;
