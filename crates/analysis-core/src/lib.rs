pub mod error;
pub mod industry;
pub mod policy;
pub mod ratios;
pub mod statement;
pub mod stats;
pub mod traits;
pub mod types;

pub use error::*;
pub use industry::*;
pub use ratios::*;
pub use statement::*;
pub use traits::*;
pub use types::*;
