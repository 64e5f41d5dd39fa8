pub mod alert;
pub mod crop;
pub mod forecast;
pub mod tip;

pub use alert::*;
pub use crop::*;
pub use forecast::*;
pub use tip::*;
