use std::rc::Rc;

use connexa_core::actions;
use connexa_core::models::Application;
use connexa_core::notice::Notice;
use connexa_core::paging::{ListController, PageQuery};
use connexa_core::{ActionError, Admin, AdminSession, Role};
use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::bridge::use_services;
use crate::components::{ApplicationBadge, NoticeList, Sentinel};
use crate::lists::{outcome_notices, ScrollTrigger, SignalList};

#[component]
pub fn AdminApplicationsPage() -> impl IntoView {
    let services = use_services();
    let key_input = create_rw_signal(String::new());
    let session = create_rw_signal(AdminSession::empty());
    let notices = create_rw_signal(Vec::<Notice>::new());
    let busy = create_rw_signal(false);
    let list = SignalList::<Application>::new();
    let trigger = ScrollTrigger::new();

    let controller = store_value(Rc::new(ListController::new(list, move |q: PageQuery<Admin>| {
        let backend = services.with_value(|s| s.backend.clone());
        trigger.guard(async move { actions::fetch_applications_page(&backend, q).await })
    })));

    let reload = move || {
        let c = controller.get_value();
        let s = session.get_untracked();
        trigger.resume();
        spawn_local(async move {
            let outcome = c.load_initial(&s).await;
            notices.update(|n| n.extend(outcome_notices(&[outcome])));
        });
    };

    trigger.watch(list, move || {
        let c = controller.get_value();
        spawn_local(async move {
            let outcome = c.load_more().await;
            notices.update(|n| n.extend(outcome_notices(&[outcome])));
        });
    });

    let start = move |_| {
        let s = AdminSession::new(key_input.get_untracked().trim());
        if !s.is_active() {
            notices.set(vec![Notice::from(ActionError::MissingIdentity(Admin::MISSING))]);
            return;
        }
        notices.set(Vec::new());
        session.set(s);
        reload();
    };

    let logout = move |_| {
        session.update(AdminSession::clear);
        key_input.set(String::new());
        notices.set(Vec::new());
        controller.with_value(|c| c.reset());
    };

    let approve = move |app: Application| {
        let s = session.get_untracked();
        let (backend, notifier, app_url) =
            services.with_value(|sv| (sv.backend.clone(), sv.notifier.clone(), sv.app_url.clone()));
        busy.set(true);
        spawn_local(async move {
            let approval = actions::approve_application(
                &backend,
                &notifier,
                &s,
                &app,
                app_url.as_deref(),
            )
            .await;
            match approval {
                Ok(approval) => {
                    notices.set(approval.notices());
                    reload();
                }
                Err(e) => notices.set(vec![Notice::from(e)]),
            }
            busy.set(false);
        });
    };

    let reject = move |app: Application| {
        let s = session.get_untracked();
        let backend = services.with_value(|sv| sv.backend.clone());
        busy.set(true);
        spawn_local(async move {
            match actions::reject_application(&backend, &s, &app).await {
                Ok(notice) => {
                    notices.set(vec![notice]);
                    reload();
                }
                Err(e) => notices.set(vec![Notice::from(e)]),
            }
            busy.set(false);
        });
    };

    view! {
      <section class="card">
        <h1>"Intenções de participação"</h1>
        <div class="row">
          <input
            type="password"
            placeholder="Chave de administrador"
            prop:value=move || key_input.get()
            on:input=move |ev| key_input.set(event_target_value(&ev))
          />
          <button on:click=start>"Carregar"</button>
          <Show when=move || session.with(AdminSession::is_active)>
            <button class="secondary" on:click=logout>"Sair"</button>
          </Show>
        </div>
      </section>

      <NoticeList notices/>

      <Show when=move || session.with(AdminSession::is_active)>
        <section class="card">
          <Show when=move || list.0.with(|l| l.is_loading_initial())>
            <p class="muted">"Carregando..."</p>
          </Show>
          <Show when=move || list.0.with(|l| l.is_loaded() && l.items().is_empty())>
            <p class="muted">"Nenhuma intenção encontrada."</p>
          </Show>
          <table>
            <thead>
              <tr>
                <th>"Nome"</th>
                <th>"Email"</th>
                <th>"Empresa"</th>
                <th>"Motivação"</th>
                <th>"Status"</th>
                <th>"Data"</th>
                <th></th>
              </tr>
            </thead>
            <tbody>
              <For
                each=move || list.0.with(|l| l.items().to_vec())
                key=|a| (a.id.clone(), a.status)
                children=move |app| {
                  let actionable = app.is_actionable();
                  let for_approve = app.clone();
                  let for_reject = app.clone();
                  view! {
                    <tr>
                      <td>{app.name.clone()}</td>
                      <td>{app.email.clone()}</td>
                      <td>{app.company.clone().unwrap_or_else(|| "-".into())}</td>
                      <td>{app.motivation.clone()}</td>
                      <td><ApplicationBadge status=app.status/></td>
                      <td>{app.created_at.format("%d/%m/%Y").to_string()}</td>
                      <td class="row">
                        <button
                          disabled=move || busy.get() || !actionable
                          on:click=move |_| approve(for_approve.clone())
                        >"Aprovar"</button>
                        <button
                          class="danger"
                          disabled=move || busy.get() || !actionable
                          on:click=move |_| reject(for_reject.clone())
                        >"Recusar"</button>
                      </td>
                    </tr>
                  }
                }
              />
            </tbody>
          </table>
          <Show when=move || list.0.with(|l| l.is_loading_more())>
            <p class="muted">"Carregando mais..."</p>
          </Show>
          <Sentinel visible=trigger.visible/>
        </section>
      </Show>
    }
}
