use connexa_core::actions;
use connexa_core::forms::ApplicationForm;
use connexa_core::notice::Notice;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::bridge::use_services;
use crate::components::NoticeList;

#[component]
pub fn ApplyPage() -> impl IntoView {
    let services = use_services();
    let form = create_rw_signal(ApplicationForm::default());
    let notices = create_rw_signal(Vec::<Notice>::new());
    let sending = create_rw_signal(false);

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if sending.get_untracked() {
            return;
        }
        let current = form.get_untracked();
        let backend = services.with_value(|s| s.backend.clone());
        sending.set(true);
        spawn_local(async move {
            let outcome = actions::submit_application(&backend, &current).await;
            form.update(|f| f.settle(&outcome));
            notices.set(vec![outcome.unwrap_or_else(Notice::from)]);
            sending.set(false);
        });
    };

    view! {
      <section class="card">
        <h1>"Faça parte da Connexa"</h1>
        <p class="muted">
          "Conte um pouco sobre você. Um administrador vai analisar sua intenção."
        </p>
        <NoticeList notices/>
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
          <textarea
            placeholder="Por que você quer participar? *"
            prop:value=move || form.with(|f| f.motivation.clone())
            on:input=move |ev| form.update(|f| f.motivation = event_target_value(&ev))
          ></textarea>
          <button type="submit" disabled=move || sending.get()>
            {move || if sending.get() { "Enviando..." } else { "Enviar intenção" }}
          </button>
        </form>
      </section>
    }
}
