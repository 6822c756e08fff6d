pub mod blob;
pub mod error;
pub mod path;
pub mod state;
pub mod token;
pub mod value;

pub use blob::*;
pub use error::*;
pub use path::*;
pub use state::*;
pub use token::*;
pub use value::*;
