pub mod decode;
pub mod encode;
pub mod grammar;
pub mod validate;
