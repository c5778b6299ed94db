pub mod abi;
pub mod primop;
pub mod runtime;
