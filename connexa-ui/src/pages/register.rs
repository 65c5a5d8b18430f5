use connexa_core::actions;
use connexa_core::forms::{invite_token, RegisterForm};
use connexa_core::notice::Notice;
use leptos::*;
use leptos_router::*;
use wasm_bindgen_futures::spawn_local;

use crate::bridge::use_services;
use crate::components::NoticeList;

/// Invite landing page. Without a `token` in the query the visitor is sent
/// back to `/` before the form is ever rendered.
#[component]
pub fn RegisterPage() -> impl IntoView {
    let query = use_query_map();
    let token = query.with_untracked(|q| invite_token(q.get("token").map(String::as_str)));

    match token {
        Some(token) => view! { <SignupForm token/> }.into_view(),
        None => {
            tracing::debug!("register page opened without token");
            view! { <Redirect path="/"/> }.into_view()
        }
    }
}

#[component]
fn SignupForm(token: String) -> impl IntoView {
    let services = use_services();
    let token = store_value(token);
    let form = create_rw_signal(RegisterForm::default());
    let notices = create_rw_signal(Vec::<Notice>::new());
    let member_id = create_rw_signal(None::<String>);
    let sending = create_rw_signal(false);

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if sending.get_untracked() {
            return;
        }
        let current = form.get_untracked();
        let (backend, notifier) = services.with_value(|s| (s.backend.clone(), s.notifier.clone()));
        let token = token.get_value();
        sending.set(true);
        spawn_local(async move {
            let outcome =
                actions::register_member(&backend, &notifier, Some(&token), &current).await;
            form.update(|f| f.settle(&outcome));
            match outcome {
                Ok(registration) => {
                    notices.set(registration.notices());
                    member_id.set(Some(registration.member_id));
                }
                Err(e) => notices.set(vec![Notice::from(e)]),
            }
            sending.set(false);
        });
    };

    view! {
      <section class="card">
        <h1>"Cadastro de membro"</h1>
        <NoticeList notices/>
        <Show
          when=move || member_id.get().is_some()
          fallback=move || view! {
            <form class="stack" on:submit=submit>
              <input
                placeholder="Nome *"
                prop:value=move || form.with(|f| f.name.clone())
                on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
              />
              <input
                type="email"
                placeholder="Email *"
                prop:value=move || form.with(|f| f.email.clone())
                on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
              />
              <input
                placeholder="Empresa"
                prop:value=move || form.with(|f| f.company.clone())
                on:input=move |ev| form.update(|f| f.company = event_target_value(&ev))
              />
              <button type="submit" disabled=move || sending.get()>
                {move || if sending.get() { "Enviando..." } else { "Concluir cadastro" }}
              </button>
            </form>
          }
        >
          <p>
            "Seu Member ID: " <code>{move || member_id.get().unwrap_or_default()}</code>
          </p>
          <p class="muted">
            "Guarde este identificador. Ele é usado para acessar suas indicações."
          </p>
          <A href="/referrals">"Ir para indicações"</A>
        </Show>
      </section>
    }
}
