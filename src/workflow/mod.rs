pub mod conversion;
pub mod definition;
pub mod raw;
pub mod value;

pub use conversion::*;
pub use definition::*;
pub use raw::*;
pub use value::*;
