pub mod catalog;
pub mod clock;

pub use catalog::MockCatalog;
pub use clock::SystemClock;
