pub mod alert;
pub mod modal;
pub mod sentinel;
pub mod status_badge;

pub use alert::NoticeList;
pub use modal::Modal;
pub use sentinel::Sentinel;
pub use status_badge::{ApplicationBadge, ReferralBadge};
