pub mod commits;
pub mod search;
