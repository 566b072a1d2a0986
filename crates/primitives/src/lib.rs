//! Collection of generic internal data types that are used widely.

#[macro_use]
mod macros;

pub mod buf;
pub mod ids;

pub use buf::{Buf20, Buf32};
pub use ids::{AppHash, Epoch, ValAddress};
