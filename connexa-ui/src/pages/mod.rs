pub mod admin_applications;
pub mod apply;
pub mod referrals;
pub mod register;
