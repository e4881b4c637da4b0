//! The page the controller runs on.
//!
//! Everything the controller needs from the surrounding quiz page goes
//! through [`Host`]. The controller never owns the host; each operation
//! borrows it for the duration of the call, and event handlers get it back
//! as an argument when they fire.

use std::fmt;

use crate::error::{PaginateError, Result};

/// Body id of the quiz attempt view.
pub const ATTEMPT_PAGE_ID: &str = "page-mod-quiz-attempt";
/// Question elements, in document order.
pub const QUESTION_SELECTOR: &str = "#page-mod-quiz-attempt #responseform .que";
/// The form holding the questions.
pub const CONTAINER_ID: &str = "responseform";
/// The finish-attempt button the navigation controls are cloned from.
pub const CLONE_SOURCE_ID: &str = "mod_quiz-next-nav";
/// The quiz navigation block.
pub const NAV_BLOCK_ID: &str = "mod_quiz_navblock";
/// Marker class on the links inside the navigation block.
pub const NAV_BUTTON_CLASS: &str = "qnbutton";
/// Class put on hidden questions.
pub const HIDDEN_CLASS: &str = "quizpaginate-hidden";

/// Ids given to the injected controls.
pub const PREVIOUS_CONTROL_ID: &str = "quizpaginate-prev";
pub const NEXT_CONTROL_ID: &str = "quizpaginate-next";

/// One `{key, component}` pair for the host's string service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringRequest {
    pub key: String,
    pub component: String,
}

impl StringRequest {
    pub fn new(key: &str, component: &str) -> Self {
        Self {
            key: key.to_string(),
            component: component.to_string(),
        }
    }
}

/// A fragment change as the host reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashChange {
    pub new_url: String,
    /// The event was raised on the window itself rather than bubbled from an element.
    pub target_is_window: bool,
}

pub type ClickHandler<H> = Box<dyn FnMut(&mut H, &<H as Host>::Element)>;
pub type HashChangeHandler<H> = Box<dyn FnMut(&mut H, &HashChange)>;
pub type StringsCallback<H> = Box<dyn FnOnce(&mut H, Result<Vec<String>>)>;

pub trait Host: Sized + 'static {
    type Element: Clone + PartialEq + fmt::Debug + 'static;

    /// Id of the page body, used to recognise the attempt view.
    fn page_id(&self) -> Option<String>;

    fn query_questions(&self) -> Vec<Self::Element>;
    fn question_container(&self) -> Option<Self::Element>;
    fn find_clone_source(&self) -> Option<Self::Element>;

    fn element_id(&self, el: &Self::Element) -> Option<String>;
    fn set_element_id(&mut self, el: &Self::Element, id: &str);
    /// Lower-case tag name.
    fn tag_name(&self, el: &Self::Element) -> String;
    fn has_class(&self, el: &Self::Element, class: &str) -> bool;
    /// Swap `from` for `to` in the class list; adds `to` even if `from` is absent.
    fn replace_class(&mut self, el: &Self::Element, from: &str, to: &str);
    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;
    fn set_attribute(&mut self, el: &Self::Element, name: &str, value: &str);
    fn set_value(&mut self, el: &Self::Element, value: &str);
    fn set_hidden(&mut self, el: &Self::Element, hidden: bool);
    fn parent(&self, el: &Self::Element) -> Option<Self::Element>;
    /// Deep copy of `el`, not yet attached to the document.
    fn clone_element(&mut self, el: &Self::Element) -> Self::Element;
    fn insert_before(&mut self, new: &Self::Element, reference: &Self::Element);
    fn scroll_into_view(&mut self, el: &Self::Element);

    fn current_url(&self) -> String;

    /// Ask the page to save in-progress answers.
    fn autosave(&mut self) -> Result<()> {
        Err(PaginateError::AutosaveUnavailable)
    }

    /// Listen for clicks on one of the injected controls.
    fn add_click_listener(&mut self, el: &Self::Element, handler: ClickHandler<Self>);
    /// Listen for any click in the document; the handler gets the click target.
    fn add_document_click_listener(&mut self, handler: ClickHandler<Self>);
    fn add_hash_change_listener(&mut self, handler: HashChangeHandler<Self>);

    /// Resolve `requests` in order and hand the result to `done`, possibly later.
    fn get_strings(&mut self, requests: Vec<StringRequest>, done: StringsCallback<Self>);
}
