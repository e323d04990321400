pub mod duplex;
pub mod manual;
pub mod shared;
