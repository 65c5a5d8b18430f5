use connexa_core::notice::{Notice, NoticeKind};
use leptos::*;

fn variant_class(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Success => "alert alert-success",
        NoticeKind::Warning => "alert alert-warning",
        NoticeKind::Error => "alert alert-error",
    }
}

/// Inline alerts at the top of a view, each dismissable on its own.
#[component]
pub fn NoticeList(notices: RwSignal<Vec<Notice>>) -> impl IntoView {
    view! {
      <div role="status">
        {move || {
            notices
                .get()
                .into_iter()
                .enumerate()
                .map(|(i, notice)| {
                    view! {
                      <div class=variant_class(notice.kind)>
                        <span><b>{notice.title()}</b> " " {notice.text.clone()}</span>
                        <button
                          class="secondary"
                          aria-label="Fechar"
                          on:click=move |_| notices.update(|all| {
                              if i < all.len() {
                                  all.remove(i);
                              }
                          })
                        >"×"</button>
                      </div>
                    }
                })
                .collect_view()
        }}
      </div>
    }
}
