pub mod cohort;
pub mod family;
pub mod goal;
pub mod interest;
pub mod path;
pub mod retrospective;
pub mod user;

pub use cohort::CohortStatistics;
pub use family::{FamilyActivityEntry, FamilyRelationship};
pub use goal::Goal;
pub use interest::UserInterest;
pub use path::{LevelPath, Milestone, PathProgress};
pub use retrospective::Retrospective;
pub use user::User;
