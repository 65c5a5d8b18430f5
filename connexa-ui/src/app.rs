use leptos::*;
use leptos_router::*;

use crate::bridge;
use crate::pages::admin_applications::AdminApplicationsPage;
use crate::pages::apply::ApplyPage;
use crate::pages::referrals::ReferralsPage;
use crate::pages::register::RegisterPage;

#[component]
pub fn App() -> impl IntoView {
    bridge::provide_services();

    view! {
      <Router>
        <nav>
          <A href="/">"Connexa"</A>
          <A href="/referrals">"Indicações"</A>
          <A href="/admin/applications">"Admin"</A>
        </nav>
        <main>
          <Routes>
            <Route path="/" view=ApplyPage/>
            <Route path="/register" view=RegisterPage/>
            <Route path="/referrals" view=ReferralsPage/>
            <Route path="/admin/applications" view=AdminApplicationsPage/>
            <Route path="/*any" view=|| view! { <Redirect path="/"/> }/>
          </Routes>
        </main>
      </Router>
    }
}
