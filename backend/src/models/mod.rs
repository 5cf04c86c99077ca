pub mod filter;
pub mod month;
pub mod range;
pub mod series;
pub mod tables;
pub mod usage;

pub use filter::*;
pub use month::*;
pub use range::*;
pub use series::*;
pub use tables::*;
pub use usage::*;
