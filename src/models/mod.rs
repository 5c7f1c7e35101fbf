pub mod criteria;
pub mod github;
