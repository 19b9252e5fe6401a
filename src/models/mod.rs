pub mod invite;
pub mod stats;
