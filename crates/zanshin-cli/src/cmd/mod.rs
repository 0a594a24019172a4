pub mod account;
pub mod organization;
pub mod scan_target;
