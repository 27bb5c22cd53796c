pub mod auth;
pub mod brief;
pub mod calendar;
pub mod error;
pub mod ids;
pub mod link;
pub mod model;
pub mod policy;
pub mod records;
pub mod render;

pub use brief::{
    BriefOptions, DebugInfo, DecisionResult, Reason, SourceRecords, check_suppression, compose,
};
pub use error::BriefError;
