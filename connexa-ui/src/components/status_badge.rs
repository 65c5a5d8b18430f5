use connexa_core::models::{ApplicationStatus, ReferralStatus};
use leptos::*;

fn application_class(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Pending => "badge badge-pending",
        ApplicationStatus::Approved => "badge badge-approved",
        ApplicationStatus::Rejected => "badge badge-rejected",
    }
}

fn referral_class(status: ReferralStatus) -> &'static str {
    match status {
        ReferralStatus::New => "badge badge-new",
        ReferralStatus::InContact => "badge badge-in-contact",
        ReferralStatus::Closed => "badge badge-closed",
        ReferralStatus::Declined => "badge badge-declined",
    }
}

#[component]
pub fn ApplicationBadge(status: ApplicationStatus) -> impl IntoView {
    view! { <span class=application_class(status)>{status.label()}</span> }
}

#[component]
pub fn ReferralBadge(status: ReferralStatus) -> impl IntoView {
    view! { <span class=referral_class(status)>{status.label()}</span> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referral_classes_are_distinct() {
        let classes: std::collections::HashSet<_> =
            ReferralStatus::ALL.into_iter().map(referral_class).collect();
        assert_eq!(classes.len(), ReferralStatus::ALL.len());
        assert_eq!(application_class(ApplicationStatus::Pending), "badge badge-pending");
    }
}
