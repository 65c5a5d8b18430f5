use std::rc::Rc;

use connexa_core::actions;
use connexa_core::forms::ReferralForm;
use connexa_core::models::{Referral, ReferralSide, ReferralStatus};
use connexa_core::notice::Notice;
use connexa_core::paging::{load_initial_pair, ListController, PageQuery};
use connexa_core::{ActionError, Member, MemberSession, Role};
use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::bridge::use_services;
use crate::components::{Modal, NoticeList, ReferralBadge, Sentinel};
use crate::lists::{outcome_notices, ScrollTrigger, SignalList};

#[component]
pub fn ReferralsPage() -> impl IntoView {
    let services = use_services();
    let member_input = create_rw_signal(String::new());
    let session = create_rw_signal(MemberSession::empty());
    let notices = create_rw_signal(Vec::<Notice>::new());
    let busy = create_rw_signal(false);
    let modal_open = create_rw_signal(false);
    let form = create_rw_signal(ReferralForm::default());

    let mine = SignalList::<Referral>::new();
    let to_me = SignalList::<Referral>::new();
    let mine_trigger = ScrollTrigger::new();
    let to_me_trigger = ScrollTrigger::new();

    let side_fetch = move |trigger: ScrollTrigger, side: ReferralSide| {
        move |q: PageQuery<Member>| {
            let backend = services.with_value(|s| s.backend.clone());
            trigger.guard(async move { actions::fetch_referrals_page(&backend, q, side).await })
        }
    };
    let mine_controller = store_value(Rc::new(ListController::new(
        mine,
        side_fetch(mine_trigger, ReferralSide::Mine),
    )));
    let to_me_controller = store_value(Rc::new(ListController::new(
        to_me,
        side_fetch(to_me_trigger, ReferralSide::ToMe),
    )));

    // Page 1 of both lists comes from one unfiltered request.
    let reload = move || {
        let s = session.get_untracked();
        let backend = services.with_value(|sv| sv.backend.clone());
        mine_trigger.resume();
        to_me_trigger.resume();
        spawn_local(async move {
            let (a, b) = load_initial_pair(&mine, &to_me, &s, |q| {
                actions::fetch_referrals_both(&backend, q)
            })
            .await;
            notices.update(|n| {
                // One request, so at most one error worth showing.
                n.extend(outcome_notices(&[a, b]).into_iter().take(1));
            });
        });
    };

    mine_trigger.watch(mine, move || {
        let c = mine_controller.get_value();
        spawn_local(async move {
            let outcome = c.load_more().await;
            notices.update(|n| n.extend(outcome_notices(&[outcome])));
        });
    });
    to_me_trigger.watch(to_me, move || {
        let c = to_me_controller.get_value();
        spawn_local(async move {
            let outcome = c.load_more().await;
            notices.update(|n| n.extend(outcome_notices(&[outcome])));
        });
    });

    let start = move |_| {
        let s = MemberSession::new(member_input.get_untracked().trim());
        if !s.is_active() {
            notices.set(vec![Notice::from(ActionError::MissingIdentity(Member::MISSING))]);
            return;
        }
        notices.set(Vec::new());
        session.set(s);
        reload();
    };

    let logout = move |_| {
        session.update(MemberSession::clear);
        member_input.set(String::new());
        notices.set(Vec::new());
        modal_open.set(false);
        mine_controller.with_value(|c| c.reset());
        to_me_controller.with_value(|c| c.reset());
    };

    let create = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let s = session.get_untracked();
        let current = form.get_untracked();
        let backend = services.with_value(|sv| sv.backend.clone());
        busy.set(true);
        spawn_local(async move {
            let outcome = actions::create_referral(&backend, &s, &current).await;
            form.update(|f| f.settle(&outcome));
            match outcome {
                Ok(notice) => {
                    notices.set(vec![notice]);
                    modal_open.set(false);
                    reload();
                }
                Err(e) => notices.set(vec![Notice::from(e)]),
            }
            busy.set(false);
        });
    };

    let change_status = move |id: String, status: ReferralStatus| {
        let s = session.get_untracked();
        let backend = services.with_value(|sv| sv.backend.clone());
        busy.set(true);
        spawn_local(async move {
            match actions::update_referral_status(&backend, &s, &id, status).await {
                Ok(notice) => {
                    notices.set(vec![notice]);
                    reload();
                }
                Err(e) => notices.set(vec![Notice::from(e)]),
            }
            busy.set(false);
        });
    };

    let is_mine = move |r: &Referral| session.with_untracked(|s| r.is_owned_by(s.secret()));

    view! {
      <section class="card">
        <h1>"Indicações"</h1>
        <div class="row">
          <input
            placeholder="Seu Member ID"
            prop:value=move || member_input.get()
            on:input=move |ev| member_input.set(event_target_value(&ev))
          />
          <button on:click=start>"Carregar"</button>
          <Show when=move || session.with(MemberSession::is_active)>
            <button on:click=move |_| modal_open.set(true)>"Nova indicação"</button>
            <button class="secondary" on:click=logout>"Sair"</button>
          </Show>
        </div>
      </section>

      <NoticeList notices/>

      <Modal open=modal_open on_close=move |_: ()| modal_open.set(false) title="Nova indicação">
        <form class="stack" on:submit=create>
          <input
            placeholder="Para Member ID *"
            prop:value=move || form.with(|f| f.to_member_id.clone())
            on:input=move |ev| form.update(|f| f.to_member_id = event_target_value(&ev))
          />
          <input
            placeholder="Empresa/Contato *"
            prop:value=move || form.with(|f| f.company_or_contact.clone())
            on:input=move |ev| form.update(|f| f.company_or_contact = event_target_value(&ev))
          />
          <textarea
            placeholder="Descrição *"
            prop:value=move || form.with(|f| f.description.clone())
            on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
          ></textarea>
          <div class="row">
            <button type="submit" disabled=move || busy.get()>"Criar"</button>
            <button type="button" class="secondary" on:click=move |_| modal_open.set(false)>
              "Cancelar"
            </button>
          </div>
        </form>
      </Modal>

      <Show when=move || session.with(MemberSession::is_active)>
        <section class="card">
          <h2>"Minhas indicações"</h2>
          <ReferralTable
            list=mine
            trigger=mine_trigger
            empty="Você ainda não fez indicações."
            status_cell=move |r: Referral| {
                if is_mine(&r) {
                    let id = r.id.clone();
                    view! {
                      <StatusSelect
                        current=r.status
                        disabled=busy
                        on_pick=move |status: ReferralStatus| change_status(id.clone(), status)
                      />
                    }
                    .into_view()
                } else {
                    view! { <ReferralBadge status=r.status/> }.into_view()
                }
            }
          />
        </section>

        <section class="card">
          <h2>"Indicações para mim"</h2>
          <ReferralTable
            list=to_me
            trigger=to_me_trigger
            empty="Nenhuma indicação recebida."
            status_cell=|r: Referral| view! { <ReferralBadge status=r.status/> }
          />
        </section>
      </Show>
    }
}

/// One infinite referral list with its own sentinel. `status_cell` renders
/// the status column of a row.
#[component]
fn ReferralTable<F, V>(
    list: SignalList<Referral>,
    trigger: ScrollTrigger,
    empty: &'static str,
    status_cell: F,
) -> impl IntoView
where
    F: Fn(Referral) -> V + Copy + 'static,
    V: IntoView,
{
    view! {
      <Show when=move || list.0.with(|l| l.is_loading_initial())>
        <p class="muted">"Carregando..."</p>
      </Show>
      <Show when=move || list.0.with(|l| l.is_loaded() && l.items().is_empty())>
        <p class="muted">{empty}</p>
      </Show>
      <table>
        <thead>
          <tr>
            <th>"De"</th>
            <th>"Para"</th>
            <th>"Empresa/Contato"</th>
            <th>"Descrição"</th>
            <th>"Status"</th>
            <th>"Atualizada"</th>
          </tr>
        </thead>
        <tbody>
          <For
            each=move || list.0.with(|l| l.items().to_vec())
            key=|r| (r.id.clone(), r.status)
            children=move |r| {
                let updated = r.updated_at.format("%d/%m/%Y").to_string();
                let status = status_cell(r.clone());
                view! {
                  <tr>
                    <td>{r.from_member_id.clone()}</td>
                    <td>{r.to_member_id.clone()}</td>
                    <td>{r.company_or_contact.clone()}</td>
                    <td>{r.description.clone()}</td>
                    <td>{status}</td>
                    <td>{updated}</td>
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
    }
}

#[component]
fn StatusSelect(
    current: ReferralStatus,
    disabled: RwSignal<bool>,
    #[prop(into)] on_pick: Callback<ReferralStatus>,
) -> impl IntoView {
    view! {
      <select
        disabled=move || disabled.get()
        on:change=move |ev| {
            if let Some(status) = ReferralStatus::parse(&event_target_value(&ev)) {
                if status != current {
                    on_pick.call(status);
                }
            }
        }
      >
        {ReferralStatus::ALL
            .into_iter()
            .map(|s| {
                view! { <option value=s.as_str() selected={s == current}>{s.label()}</option> }
            })
            .collect_view()}
      </select>
    }
}
