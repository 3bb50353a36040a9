//! Data module - dataset loading and reshaping

mod loader;
mod reshaper;

pub use loader::{load, load_in_background, Dataset, LoadHandle, LoaderError, Record};
pub use reshaper::{LongTuple, Reshaper};
