pub mod layout;
pub mod migrate;
