use leptos::*;

#[component]
pub fn Modal(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] on_close: Callback<()>,
    title: &'static str,
    children: ChildrenFn,
) -> impl IntoView {
    let children = store_value(children);

    view! {
      <Show when=move || open.get()>
        <div class="modal-backdrop" on:click=move |_| on_close.call(())>
          <div class="modal" on:click=|ev| ev.stop_propagation()>
            <h3>{title}</h3>
            {children.with_value(|c| c())}
          </div>
        </div>
      </Show>
    }
}
