//! WebAssembly content-script bindings for ZenTube
//!
//! The JS loader instantiates this module in the hosted page and calls
//! `boot` once. Everything after that is event-driven: the storage bulk
//! read, storage change notifications, and coalesced mutation bursts all
//! funnel into the same engine apply pass. Callbacks live for the page
//! lifetime and are intentionally leaked; teardown is the page unload.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, HtmlCollection, MutationObserver, MutationObserverInit};

use zt_core::engine::Engine;
use zt_core::page::{PageDom, Visibility};
use zt_core::settings::SettingKey;
use zt_core::watch::{MutationCoalescer, DEBOUNCE_MS};

struct ScriptState {
    engine: Engine,
    coalescer: MutationCoalescer,
    flush: Option<Closure<dyn FnMut()>>,
    booted: bool,
}

thread_local! {
    static STATE: RefCell<ScriptState> = RefCell::new(ScriptState {
        engine: Engine::new(),
        coalescer: MutationCoalescer::new(),
        flush: None,
        booted: false,
    });
}

#[wasm_bindgen]
pub fn boot() -> Result<(), JsValue> {
    if STATE.with(|s| s.borrow().booted) {
        return Err(JsValue::from_str("Already booted. Reload the page to reinitialize."));
    }

    install_logger();
    STATE.with(|s| s.borrow_mut().booted = true);

    request_initial_settings()?;
    subscribe_to_changes()?;
    start_observer()?;

    Ok(())
}

#[wasm_bindgen]
pub fn is_booted() -> bool {
    STATE.with(|s| s.borrow().booted)
}

/// Run one apply pass outside the usual triggers. Safe to call repeatedly.
#[wasm_bindgen]
pub fn apply_now() {
    STATE.with(|s| {
        let state = &mut *s.borrow_mut();
        apply_current(&mut state.engine);
    });
}

#[wasm_bindgen]
pub fn engine_info() -> JsValue {
    let result = js_sys::Object::new();
    STATE.with(|s| {
        let state = s.borrow();
        let _ = js_sys::Reflect::set(&result, &"booted".into(), &JsValue::from(state.booted));
        for key in SettingKey::ALL {
            let _ = js_sys::Reflect::set(
                &result,
                &key.as_str().into(),
                &JsValue::from(state.engine.settings().get(key)),
            );
        }
    });
    result.into()
}

// =============================================================================
// Storage bridge
// =============================================================================

fn chrome_storage() -> Result<JsValue, JsValue> {
    let chrome = js_sys::Reflect::get(&js_sys::global(), &"chrome".into())?;
    let storage = js_sys::Reflect::get(&chrome, &"storage".into())?;
    if storage.is_undefined() {
        return Err(JsValue::from_str("chrome.storage is unavailable in this context"));
    }
    Ok(storage)
}

fn get_method(target: &JsValue, name: &str) -> Result<js_sys::Function, JsValue> {
    js_sys::Reflect::get(target, &name.into())?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| JsValue::from_str(&format!("{name} is not a function")))
}

/// Issue the one-time bulk read for every key the engine owns.
fn request_initial_settings() -> Result<(), JsValue> {
    let area = js_sys::Reflect::get(&chrome_storage()?, &"local".into())?;
    let get = get_method(&area, "get")?;

    let keys = js_sys::Array::new();
    for key in SettingKey::ALL {
        keys.push(&JsValue::from_str(key.as_str()));
    }

    let on_loaded = Closure::wrap(Box::new(move |result: JsValue| {
        let pairs = snapshot_pairs(&result);
        STATE.with(|s| {
            let state = &mut *s.borrow_mut();
            state.engine.load_snapshot(pairs);
            apply_current(&mut state.engine);
        });
    }) as Box<dyn FnMut(JsValue)>);

    get.call2(&area, &keys, on_loaded.as_ref().unchecked_ref())?;
    on_loaded.forget();
    Ok(())
}

/// Subscribe to live changes made from the popup.
fn subscribe_to_changes() -> Result<(), JsValue> {
    let on_changed = js_sys::Reflect::get(&chrome_storage()?, &"onChanged".into())?;
    let add_listener = get_method(&on_changed, "addListener")?;

    let on_change = Closure::wrap(Box::new(move |changes: JsValue| {
        STATE.with(|s| {
            let state = &mut *s.borrow_mut();
            for (key, value) in changed_pairs(&changes) {
                state.engine.update(key, value);
            }
            // One pass per notification batch, whatever it carried.
            apply_current(&mut state.engine);
        });
    }) as Box<dyn FnMut(JsValue)>);

    add_listener.call1(&on_changed, on_change.as_ref().unchecked_ref())?;
    on_change.forget();
    Ok(())
}

/// Bulk-read values with the store's JS truthiness: absent keys read as
/// `undefined` and coerce to `false`.
fn snapshot_pairs(result: &JsValue) -> Vec<(SettingKey, bool)> {
    SettingKey::ALL
        .iter()
        .map(|&key| {
            let value = js_sys::Reflect::get(result, &key.as_str().into())
                .map(|v| v.is_truthy())
                .unwrap_or(false);
            (key, value)
        })
        .collect()
}

/// Extract `(key, newValue)` pairs from a change-notification record,
/// dropping keys this engine does not own.
fn changed_pairs(changes: &JsValue) -> Vec<(SettingKey, bool)> {
    let mut pairs = Vec::new();
    let object = match changes.dyn_ref::<js_sys::Object>() {
        Some(object) => object,
        None => return pairs,
    };

    for key in js_sys::Object::keys(object).iter() {
        let name = match key.as_string() {
            Some(name) => name,
            None => continue,
        };
        let setting = match SettingKey::parse(&name) {
            Some(setting) => setting,
            None => continue,
        };
        let new_value = js_sys::Reflect::get(changes, &key)
            .and_then(|change| js_sys::Reflect::get(&change, &"newValue".into()))
            .map(|value| value.is_truthy())
            .unwrap_or(false);
        pairs.push((setting, new_value));
    }

    pairs
}

// =============================================================================
// Mutation watcher
// =============================================================================

/// Observe structural mutations on the whole document body for the lifetime
/// of the page. Bursts are coalesced into one trailing apply pass.
fn start_observer() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body yet"))?;

    let flush = Closure::wrap(Box::new(move || {
        STATE.with(|s| {
            let state = &mut *s.borrow_mut();
            if state.coalescer.flush() {
                apply_current(&mut state.engine);
            }
        });
    }) as Box<dyn FnMut()>);
    STATE.with(|s| s.borrow_mut().flush = Some(flush));

    let on_mutations = Closure::wrap(Box::new(move |_records: JsValue, _observer: JsValue| {
        schedule_flush();
    }) as Box<dyn FnMut(JsValue, JsValue)>);

    let observer = MutationObserver::new(on_mutations.as_ref().unchecked_ref())?;
    on_mutations.forget();

    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer.observe_with_options(&body, &init)?;

    Ok(())
}

fn schedule_flush() {
    STATE.with(|s| {
        let state = &mut *s.borrow_mut();
        if !state.coalescer.signal() {
            return;
        }
        if let (Some(window), Some(flush)) = (web_sys::window(), state.flush.as_ref()) {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                flush.as_ref().unchecked_ref(),
                DEBOUNCE_MS,
            );
        }
    });
}

// =============================================================================
// Page access
// =============================================================================

struct DocumentPage {
    window: web_sys::Window,
    document: web_sys::Document,
}

impl DocumentPage {
    fn acquire() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    fn set_collection_display(collection: &HtmlCollection, visibility: Visibility) {
        for index in 0..collection.length() {
            if let Some(element) = collection.item(index) {
                set_element_display(&element, visibility);
            }
        }
    }
}

fn set_element_display(element: &web_sys::Element, visibility: Visibility) {
    if let Some(html) = element.dyn_ref::<web_sys::HtmlElement>() {
        let _ = html.style().set_property("display", visibility.css_value());
    }
}

impl PageDom for DocumentPage {
    fn set_display_by_tag(&mut self, tag: &str, visibility: Visibility) {
        Self::set_collection_display(&self.document.get_elements_by_tag_name(tag), visibility);
    }

    fn set_display_by_id(&mut self, id: &str, visibility: Visibility) {
        if let Some(element) = self.document.get_element_by_id(id) {
            set_element_display(&element, visibility);
        }
    }

    fn set_display_by_class(&mut self, class: &str, visibility: Visibility) {
        Self::set_collection_display(&self.document.get_elements_by_class_name(class), visibility);
    }

    fn location_href(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn navigate(&mut self, url: &str) {
        let _ = self.window.location().set_href(url);
    }

    fn warn(&mut self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }
}

fn apply_current(engine: &mut Engine) {
    if let Some(mut page) = DocumentPage::acquire() {
        engine.apply(&mut page);
    }
}

// =============================================================================
// Logging
// =============================================================================

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let line = format!("[zentube] {}: {}", record.level(), record.args());
        match record.level() {
            log::Level::Error => console::error_1(&line.into()),
            log::Level::Warn => console::warn_1(&line.into()),
            _ => console::log_1(&line.into()),
        }
    }

    fn flush(&self) {}
}

fn install_logger() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn change_record(new_value: &JsValue) -> js_sys::Object {
        let change = js_sys::Object::new();
        js_sys::Reflect::set(&change, &"newValue".into(), new_value).unwrap();
        change
    }

    #[wasm_bindgen_test]
    fn changed_pairs_reads_new_values() {
        let changes = js_sys::Object::new();
        js_sys::Reflect::set(
            &changes,
            &"hideShorts".into(),
            &change_record(&JsValue::from(true)),
        )
        .unwrap();

        let pairs = changed_pairs(&changes.into());
        assert_eq!(pairs, vec![(SettingKey::HideShorts, true)]);
    }

    #[wasm_bindgen_test]
    fn changed_pairs_drops_unknown_keys() {
        let changes = js_sys::Object::new();
        js_sys::Reflect::set(
            &changes,
            &"autoplay".into(),
            &change_record(&JsValue::from(true)),
        )
        .unwrap();

        assert!(changed_pairs(&changes.into()).is_empty());
    }

    #[wasm_bindgen_test]
    fn snapshot_pairs_coerces_absent_to_false() {
        let result = js_sys::Object::new();
        js_sys::Reflect::set(&result, &"focusMode".into(), &JsValue::from(true)).unwrap();

        let pairs = snapshot_pairs(&result.into());
        assert_eq!(pairs.len(), SettingKey::ALL.len());
        for (key, value) in pairs {
            assert_eq!(value, key == SettingKey::FocusMode);
        }
    }
}
