pub mod builder;
pub mod loader;
pub mod quarter;

pub use builder::ScheduleBuilder;
pub use loader::{load_schedule, ProgramRow};
pub use quarter::quarter_of;
