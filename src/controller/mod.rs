pub mod interpreter;
pub mod message;
pub mod names;
pub mod session;
pub mod transport;
