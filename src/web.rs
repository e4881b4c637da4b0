//! Browser binding: the controller driven by the live attempt page.

use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, Event, HashChangeEvent, HtmlElement, HtmlInputElement};

use crate::controller;
use crate::error::{PaginateError, Result};
use crate::host::{
    ClickHandler, HashChange, HashChangeHandler, Host, StringRequest, StringsCallback,
    CLONE_SOURCE_ID, CONTAINER_ID, HIDDEN_CLASS, QUESTION_SELECTOR,
};
use crate::lang;

#[derive(Clone)]
pub struct WebHost {
    window: web_sys::Window,
    document: web_sys::Document,
}

impl WebHost {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    /// `M.<path...>` on the window, if every step exists.
    fn moodle_global(&self, path: &[&str]) -> Option<JsValue> {
        let mut value: JsValue = Reflect::get(&self.window, &JsValue::from_str("M")).ok()?;
        for step in path {
            if value.is_undefined() || value.is_null() {
                return None;
            }
            value = Reflect::get(&value, &JsValue::from_str(step)).ok()?;
        }
        if value.is_undefined() || value.is_null() {
            None
        } else {
            Some(value)
        }
    }
}

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

impl Host for WebHost {
    type Element = Element;

    fn page_id(&self) -> Option<String> {
        self.document.body().map(|b| b.id())
    }

    fn query_questions(&self) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(QUESTION_SELECTOR) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .collect()
    }

    fn question_container(&self) -> Option<Element> {
        self.document.get_element_by_id(CONTAINER_ID)
    }

    fn find_clone_source(&self) -> Option<Element> {
        self.document.get_element_by_id(CLONE_SOURCE_ID)
    }

    fn element_id(&self, el: &Element) -> Option<String> {
        let id = el.id();
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    fn set_element_id(&mut self, el: &Element, id: &str) {
        el.set_id(id);
    }

    fn tag_name(&self, el: &Element) -> String {
        el.tag_name().to_ascii_lowercase()
    }

    fn has_class(&self, el: &Element, class: &str) -> bool {
        el.class_list().contains(class)
    }

    fn replace_class(&mut self, el: &Element, from: &str, to: &str) {
        let list = el.class_list();
        if !list.replace(from, to).unwrap_or(false) {
            let _ = list.add_1(to);
        }
    }

    fn attribute(&self, el: &Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_attribute(&mut self, el: &Element, name: &str, value: &str) {
        let _ = el.set_attribute(name, value);
    }

    fn set_value(&mut self, el: &Element, value: &str) {
        match el.dyn_ref::<HtmlInputElement>() {
            Some(input) => input.set_value(value),
            None => {
                let _ = el.set_attribute("value", value);
            }
        }
    }

    fn set_hidden(&mut self, el: &Element, hidden: bool) {
        let _ = el.class_list().toggle_with_force(HIDDEN_CLASS, hidden);
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            html.set_hidden(hidden);
        }
    }

    fn parent(&self, el: &Element) -> Option<Element> {
        el.parent_element()
    }

    fn clone_element(&mut self, el: &Element) -> Element {
        el.clone_node_with_deep(true)
            .ok()
            .and_then(|n| n.dyn_into::<Element>().ok())
            .unwrap_or_else(|| el.clone())
    }

    fn insert_before(&mut self, new: &Element, reference: &Element) {
        let reference: &web_sys::Node = reference;
        if let Some(parent) = reference.parent_node() {
            let _ = parent.insert_before(new, Some(reference));
        }
    }

    fn scroll_into_view(&mut self, el: &Element) {
        el.scroll_into_view();
    }

    fn current_url(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn autosave(&mut self) -> Result<()> {
        let autosave = self
            .moodle_global(&["mod_quiz", "autosave"])
            .ok_or(PaginateError::AutosaveUnavailable)?;
        let save: Function = Reflect::get(&autosave, &JsValue::from_str("save_changes"))
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or(PaginateError::AutosaveUnavailable)?;
        save.call0(&autosave)
            .map(|_| ())
            .map_err(|e| PaginateError::Autosave(js_error(e)))
    }

    fn add_click_listener(&mut self, el: &Element, handler: ClickHandler<Self>) {
        let mut handler = handler;
        let target = el.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
            // the clones are submit buttons; clicking must not post the form
            ev.prevent_default();
            if let Some(mut host) = WebHost::new() {
                handler(&mut host, &target);
            }
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn add_document_click_listener(&mut self, handler: ClickHandler<Self>) {
        let mut handler = handler;
        let closure = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
            let Some(target) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            if let Some(mut host) = WebHost::new() {
                handler(&mut host, &target);
            }
        });
        let _ = self
            .document
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn add_hash_change_listener(&mut self, handler: HashChangeHandler<Self>) {
        let mut handler = handler;
        let closure = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
            let Some(mut host) = WebHost::new() else {
                return;
            };
            let target_is_window = ev
                .target()
                .map(|t| t.is_instance_of::<web_sys::Window>())
                .unwrap_or(false);
            let new_url = ev
                .dyn_ref::<HashChangeEvent>()
                .map(|h| h.new_url())
                .unwrap_or_else(|| host.current_url());
            let change = HashChange {
                new_url,
                target_is_window,
            };
            handler(&mut host, &change);
        });
        let _ = self
            .window
            .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn get_strings(&mut self, requests: Vec<StringRequest>, done: StringsCallback<Self>) {
        let window = self.window.clone();
        spawn_local(async move {
            let result = fetch_strings(&window, &requests).await;
            if let Some(mut host) = WebHost::new() {
                done(&mut host, result);
            }
        });
    }
}

fn strings_error(e: JsValue) -> PaginateError {
    PaginateError::Strings(js_error(e))
}

/// Load an AMD module through the page's RequireJS loader.
fn require_module(window: &web_sys::Window, name: &str) -> Result<Promise> {
    let require: Function = Reflect::get(window, &JsValue::from_str("require"))
        .ok()
        .and_then(|f| f.dyn_into().ok())
        .ok_or_else(|| PaginateError::Strings("no AMD loader on this page".to_string()))?;
    let deps = Array::of1(&JsValue::from_str(name));
    Ok(Promise::new(&mut |resolve, reject| {
        if let Err(e) = require.call3(&JsValue::NULL, &deps, &resolve, &reject) {
            let _ = reject.call1(&JsValue::NULL, &e);
        }
    }))
}

/// Ask `core/str` for every request in one batch.
async fn fetch_strings(window: &web_sys::Window, requests: &[StringRequest]) -> Result<Vec<String>> {
    let module = JsFuture::from(require_module(window, "core/str")?)
        .await
        .map_err(strings_error)?;
    let get_strings: Function = Reflect::get(&module, &JsValue::from_str("get_strings"))
        .ok()
        .and_then(|f| f.dyn_into().ok())
        .ok_or_else(|| PaginateError::Strings("core/str has no get_strings".to_string()))?;

    let batch = Array::new();
    for request in requests {
        let entry = Object::new();
        Reflect::set(&entry, &JsValue::from_str("key"), &JsValue::from_str(&request.key))
            .map_err(strings_error)?;
        Reflect::set(
            &entry,
            &JsValue::from_str("component"),
            &JsValue::from_str(&request.component),
        )
        .map_err(strings_error)?;
        batch.push(&entry);
    }

    // older releases hand back a jQuery promise; resolve() adopts any thenable
    let pending = get_strings.call1(&module, &batch).map_err(strings_error)?;
    let answered = JsFuture::from(Promise::resolve(&pending))
        .await
        .map_err(strings_error)?;
    let answers: Vec<Option<String>> = Array::from(&answered)
        .iter()
        .map(|v| v.as_string())
        .collect();
    lang::checked_answers(requests, answers)
}

/// Page entry point. Returns whether pagination is running; configuration
/// problems are written to the console instead of thrown.
#[wasm_bindgen]
pub fn init(questions_per_page: JsValue) -> bool {
    let Some(mut host) = WebHost::new() else {
        return false;
    };
    let started = if let Some(n) = questions_per_page.as_f64() {
        controller::init(&mut host, n)
    } else if let Some(s) = questions_per_page.as_string() {
        controller::init(&mut host, s.as_str())
    } else {
        Err(PaginateError::InvalidQuestionsPerPage(format!(
            "{:?}",
            questions_per_page
        )))
    };
    match started {
        Ok(ctrl) => ctrl.borrow_mut().is_active(&host),
        // configuration problems are the page author's to fix
        Err(e) if e.is_configuration() => {
            tracing::error!(error = %e, "pagination not started");
            web_sys::console::error_1(&JsValue::from_str(&format!("quizpaginate: {}", e)));
            false
        }
        Err(e) => {
            tracing::debug!(error = %e, "pagination not started");
            web_sys::console::debug_1(&JsValue::from_str(&format!("quizpaginate: {}", e)));
            false
        }
    }
}
