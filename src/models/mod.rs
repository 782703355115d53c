pub mod workout;
pub mod stream;
pub mod recovery;
pub mod analysis;

pub use analysis::{RiskLevel, WeeklyLoadAnalysis};
pub use recovery::{FatigueSnapshot, FormStatus};
pub use stream::{Lap, LapType, MileSplit, RawStream, Sample};
pub use workout::WorkoutRecord;
