pub mod dataset;
pub mod user;

pub use dataset::{Dataset, DatasetWithOwner};
pub use user::User;
