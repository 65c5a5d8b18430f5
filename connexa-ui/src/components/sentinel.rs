//! End-of-list marker whose visibility drives incremental loading.

use leptos::html::Div;
use leptos::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

const VISIBLE_THRESHOLD: f64 = 0.1;

type EntriesCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

struct Watch {
    observer: IntersectionObserver,
    _callback: EntriesCallback,
}

impl Watch {
    fn start(target: &web_sys::Element, visible: RwSignal<bool>) -> Result<Self, JsValue> {
        let callback: EntriesCallback =
            Closure::new(move |entries: js_sys::Array, _: IntersectionObserver| {
                // Only changed entries are delivered; the latest one wins.
                if let Some(entry) = entries.iter().last() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    visible.try_set(entry.is_intersecting());
                }
            });
        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(VISIBLE_THRESHOLD));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        observer.observe(target);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    fn stop(self) {
        self.observer.disconnect();
    }
}

#[component]
pub fn Sentinel(visible: RwSignal<bool>) -> impl IntoView {
    let node = create_node_ref::<Div>();
    let watch = store_value(None::<Watch>);

    node.on_load(move |el| match Watch::start(&el, visible) {
        Ok(w) => watch.set_value(Some(w)),
        Err(e) => tracing::warn!(error = ?e, "IntersectionObserver unavailable"),
    });
    on_cleanup(move || {
        watch.try_update_value(|w| {
            if let Some(w) = w.take() {
                w.stop();
            }
        });
        visible.try_set(false);
    });

    view! { <div node_ref=node class="sentinel" aria-hidden="true"></div> }
}
