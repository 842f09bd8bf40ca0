//! Daily Habits entry point
//!
//! Runs the browser front end on wasm32 and a small terminal front end
//! everywhere else.

#[cfg(not(target_arch = "wasm32"))]
mod cli;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::Cell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

    use daily_habits::celebrate::{CONFETTI_LIFETIME_MS, Confetti};
    use daily_habits::persistence::{BlobBackend, KeyValueStore, LocalStorage, MemoryStorage};
    use daily_habits::platform::{EnvSignals, HintState, classify};
    use daily_habits::view::{HabitRow, ListView};
    use daily_habits::{HabitStore, Theme};

    type SharedStorage = Rc<dyn KeyValueStore>;

    /// Page state. The habit list itself lives only in the store.
    struct App {
        store: HabitStore<BlobBackend<SharedStorage>>,
        storage: SharedStorage,
        document: Document,
    }

    impl App {
        /// Rebuild the habit list from a fresh snapshot
        async fn render(&self) {
            let habits = self.store.habits().await;
            let Some(list) = self.document.get_element_by_id("habit-list") else {
                return;
            };
            list.set_inner_html("");
            let empty_state = self.document.get_element_by_id("empty-state");

            match ListView::from_habits(&habits, &chrono::Local) {
                ListView::Empty => {
                    if let Some(el) = empty_state {
                        set_hidden(&el, false);
                    }
                }
                ListView::Rows(rows) => {
                    if let Some(el) = empty_state {
                        set_hidden(&el, true);
                    }
                    for row in &rows {
                        match self.build_row(row) {
                            Ok(li) => {
                                let _ = list.append_child(&li);
                            }
                            Err(e) => log::warn!("Could not render habit {}: {:?}", row.id, e),
                        }
                    }
                }
            }
        }

        fn build_row(&self, row: &HabitRow) -> Result<Element, JsValue> {
            let doc = &self.document;

            let li = doc.create_element("li")?;
            li.set_class_name("habit-item fade-in");

            let meta = doc.create_element("div")?;
            meta.set_class_name("habit-meta");

            let name = doc.create_element("span")?;
            name.set_class_name("habit-name");
            name.set_text_content(Some(&row.name));

            let stats = doc.create_element("span")?;
            stats.set_class_name("habit-stats");
            stats.set_text_content(Some(&row.stats));

            meta.append_child(&name)?;
            meta.append_child(&stats)?;

            let actions = doc.create_element("div")?;
            actions.set_class_name("habit-actions");

            // Clicks are handled by one delegated listener on the list
            let done = doc.create_element("button")?;
            done.set_text_content(Some("Done today"));
            done.set_attribute("data-action", "done")?;
            done.set_attribute("data-id", &row.id)?;

            let delete = doc.create_element("button")?;
            delete.set_text_content(Some("✕"));
            delete.set_class_name("delete-btn");
            delete.set_attribute("data-action", "delete")?;
            delete.set_attribute("data-id", &row.id)?;

            actions.append_child(&done)?;
            actions.append_child(&delete)?;

            li.append_child(&meta)?;
            li.append_child(&actions)?;
            Ok(li)
        }

        async fn add(&self, raw_name: &str) {
            if self.store.add(raw_name).await.is_some() {
                self.render().await;
            }
        }

        async fn mark_done(&self, id: &str) {
            tap_feedback();
            let Some(done) = self.store.mark_done(id).await else {
                return;
            };
            self.render().await;
            self.confetti_burst();

            if let Some(message) = done.value.milestone {
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message(&message);
                }
            }
        }

        async fn delete(&self, id: &str) {
            if self.store.delete(id).await.is_some() {
                self.render().await;
            }
        }

        fn confetti_burst(&self) {
            let confetti = Confetti::random(&mut rand::rng());
            let Some(body) = self.document.body() else {
                return;
            };
            let Ok(el) = self.document.create_element("div") else {
                return;
            };
            el.set_class_name("confetti");
            el.set_text_content(Some(confetti.emoji));
            if let Ok(html) = el.clone().dyn_into::<HtmlElement>() {
                let _ = html
                    .style()
                    .set_property("left", &format!("{:.1}%", confetti.left_percent));
            }
            let _ = body.append_child(&el);

            if let Some(window) = web_sys::window() {
                let remove = Closure::once_into_js(move || el.remove());
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    remove.unchecked_ref(),
                    CONFETTI_LIFETIME_MS,
                );
            }
        }
    }

    /// LocalStorage, or a throwaway in-memory store when the browser refuses
    fn open_storage() -> SharedStorage {
        match LocalStorage::open() {
            Ok(storage) => Rc::new(storage),
            Err(e) => {
                log::warn!("{e}; habits will not survive a reload");
                Rc::new(MemoryStorage::new())
            }
        }
    }

    fn set_hidden(el: &Element, hidden: bool) {
        let classes = el.class_list();
        let _ = if hidden {
            classes.add_1("hidden")
        } else {
            classes.remove_1("hidden")
        };
    }

    fn has_property(target: &JsValue, name: &str) -> bool {
        js_sys::Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
    }

    /// Short vibration on devices that support it
    fn tap_feedback() {
        if let Some(window) = web_sys::window() {
            let navigator = window.navigator();
            if has_property(&navigator, "vibrate") {
                navigator.vibrate_with_duration(10);
            }
        }
    }

    fn on_click(el: &Element, mut handler: impl FnMut() + 'static) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Failed to init logger: {e}").into());
        }

        // The same module is loaded by the service worker, which has no window
        let Some(window) = web_sys::window() else {
            log::debug!("No window, skipping page setup");
            return;
        };

        log::info!("Daily Habits starting...");

        let document = window.document().expect("no document");
        let storage = open_storage();
        let app = Rc::new(App {
            store: HabitStore::new(BlobBackend::new(storage.clone())),
            storage,
            document,
        });

        app.store.load().await;
        app.render().await;

        setup_habit_form(app.clone());
        setup_list_actions(app.clone());
        setup_install_hint(app.clone());
        setup_theme_toggle(app.clone());
        register_service_worker(&window);

        log::info!("Daily Habits running!");
    }

    fn setup_habit_form(app: Rc<App>) {
        let form = app.document.get_element_by_id("habit-form");
        let input = app
            .document
            .get_element_by_id("habit-name")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        let (Some(form), Some(input)) = (form, input) else {
            log::warn!("Habit form missing from page");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            let raw_name = input.value();
            input.set_value("");
            let app = app.clone();
            spawn_local(async move { app.add(&raw_name).await });
        });
        let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_list_actions(app: Rc<App>) {
        let Some(list) = app.document.get_element_by_id("habit-list") else {
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            let button = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("button[data-action]").ok().flatten());
            let Some(button) = button else {
                return;
            };
            let (Some(action), Some(id)) = (
                button.get_attribute("data-action"),
                button.get_attribute("data-id"),
            ) else {
                return;
            };

            let app = app.clone();
            spawn_local(async move {
                match action.as_str() {
                    "done" => app.mark_done(&id).await,
                    "delete" => app.delete(&id).await,
                    other => log::warn!("Unknown habit action {other:?}"),
                }
            });
        });
        let _ = list.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_install_hint(app: Rc<App>) {
        let doc = &app.document;
        let (Some(hint), Some(text)) = (
            doc.get_element_by_id("install-hint"),
            doc.get_element_by_id("hint-text"),
        ) else {
            return;
        };

        let hints = Rc::new(HintState::new(app.storage.clone()));
        let platform = classify(&EnvSignals::detect());
        log::info!("Detected platform: {}", platform.as_str());

        if let Some(message) = hints.visible_message(platform) {
            text.set_text_content(Some(message));
            set_hidden(&hint, false);
        }

        if let Some(dismiss) = doc.get_element_by_id("hint-dismiss") {
            let hint = hint.clone();
            let hints = hints.clone();
            on_click(&dismiss, move || {
                set_hidden(&hint, true);
                hints.dismiss();
            });
        }

        if let Some(open) = doc.get_element_by_id("open-install-hint") {
            on_click(&open, move || {
                match hints.reopen(classify(&EnvSignals::detect())) {
                    Some(message) => {
                        text.set_text_content(Some(message));
                        set_hidden(&hint, false);
                    }
                    None => log::info!("Already installed, no hint to show"),
                }
            });
        }
    }

    fn setup_theme_toggle(app: Rc<App>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(root) = app.document.document_element() else {
            return;
        };
        let prefers_dark = window
            .match_media("(prefers-color-scheme: dark)")
            .ok()
            .flatten()
            .map(|m| m.matches())
            .unwrap_or(false);

        let theme = Rc::new(Cell::new(Theme::load(&app.storage, prefers_dark)));
        let toggle = app.document.get_element_by_id("theme-toggle");
        apply_theme(&root, toggle.as_ref(), theme.get());

        if let Some(button) = toggle {
            let label = button.clone();
            on_click(&button, move || {
                let next = theme.get().toggle();
                theme.set(next);
                next.save(&app.storage);
                apply_theme(&root, Some(&label), next);
            });
        }
    }

    fn apply_theme(root: &Element, toggle: Option<&Element>, theme: Theme) {
        let classes = root.class_list();
        let _ = if theme.is_dark() {
            classes.add_1("dark")
        } else {
            classes.remove_1("dark")
        };
        if let Some(button) = toggle {
            button.set_text_content(Some(theme.toggle_icon()));
        }
    }

    fn register_service_worker(window: &web_sys::Window) {
        let navigator = window.navigator();
        // Missing on insecure origins
        if !has_property(&navigator, "serviceWorker") {
            log::info!("Service workers unavailable, running online only");
            return;
        }

        let options = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&options, &"type".into(), &"module".into());
        let promise = navigator
            .service_worker()
            .register_with_options("./service-worker.js", options.unchecked_ref());

        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => log::info!("Service worker registered"),
                Err(e) => log::warn!("Service worker registration failed: {:?}", e),
            }
        });
    }
}

/// Service worker event handlers, called from `service-worker.js`
#[cfg(target_arch = "wasm32")]
mod service_worker {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Cache, CacheStorage, Request, Response, ServiceWorkerGlobalScope};

    use daily_habits::offline::{ASSETS, CACHE_NAME, cache_first, stale_caches};

    fn scope() -> Result<ServiceWorkerGlobalScope, JsValue> {
        js_sys::global()
            .dyn_into::<ServiceWorkerGlobalScope>()
            .map_err(|_| JsValue::from_str("not running in a service worker"))
    }

    fn caches() -> Result<CacheStorage, JsValue> {
        scope()?.caches()
    }

    async fn open_current() -> Result<Cache, JsValue> {
        let cache = JsFuture::from(caches()?.open(CACHE_NAME)).await?;
        Ok(cache.unchecked_into())
    }

    /// Pre-cache every asset under the current cache name
    #[wasm_bindgen]
    pub async fn sw_install() -> Result<(), JsValue> {
        let cache = open_current().await?;
        let assets: js_sys::Array = ASSETS.iter().copied().map(JsValue::from_str).collect();
        JsFuture::from(cache.add_all_with_str_sequence(&assets)).await?;
        log::info!("Cached {} assets in {}", ASSETS.len(), CACHE_NAME);
        Ok(())
    }

    /// Delete caches left behind by older versions
    #[wasm_bindgen]
    pub async fn sw_activate() -> Result<(), JsValue> {
        let caches = caches()?;
        let keys: js_sys::Array = JsFuture::from(caches.keys()).await?.unchecked_into();
        let existing: Vec<String> = keys.iter().filter_map(|k| k.as_string()).collect();
        for stale in stale_caches(&existing) {
            JsFuture::from(caches.delete(stale)).await?;
            log::info!("Deleted stale cache {stale}");
        }
        Ok(())
    }

    /// Cached response when there is one, otherwise the network
    #[wasm_bindgen]
    pub async fn sw_fetch(request: Request) -> Result<Response, JsValue> {
        let scope = scope()?;
        let hit = JsFuture::from(scope.caches()?.match_with_request(&request)).await?;
        let cached = hit.dyn_into::<Response>().ok();
        cache_first(cached, || async {
            let response = JsFuture::from(scope.fetch_with_request(&request)).await?;
            response.dyn_into::<Response>()
        })
        .await
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
