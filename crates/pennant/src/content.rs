mod entry;
mod front_matter;
mod page;
mod reading_metrics;
mod repository;
mod sorting;

pub use entry::*;
pub use front_matter::*;
pub use page::*;
pub use reading_metrics::*;
pub use repository::*;
pub use sorting::*;
