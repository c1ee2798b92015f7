pub mod processor;
pub mod reader;
pub mod response;
