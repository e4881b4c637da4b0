use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, info, warn};

use crate::anchor;
use crate::error::{PaginateError, Result};
use crate::host::{
    HashChange, Host, StringRequest, ATTEMPT_PAGE_ID, CLONE_SOURCE_ID, NAV_BLOCK_ID,
    NAV_BUTTON_CLASS, NEXT_CONTROL_ID, PREVIOUS_CONTROL_ID,
};
use crate::window::{visible_mask, QuestionsPerPage, Window};

pub const PRIMARY_CLASS: &str = "btn-primary";
pub const SECONDARY_CLASS: &str = "btn-secondary";
/// Attribute mirroring the control label.
pub const LABEL_ATTRIBUTE: &str = "data-initial-value";
/// Component the button labels are looked up in.
pub const STRINGS_COMPONENT: &str = "moodle";

pub type SharedController<H> = Rc<RefCell<PaginationController<H>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    Unchecked,
    Active,
    Inactive,
}

/// The two injected navigation buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls<E> {
    pub previous: E,
    pub next: E,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Shows a fixed-size window of the questions on a one-page quiz attempt.
pub struct PaginationController<H: Host> {
    window: Window,
    questions: Vec<H::Element>,
    guard: Guard,
    controls: Option<Controls<H::Element>>,
}

impl<H: Host> std::fmt::Debug for PaginationController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("window", &self.window)
            .field("questions", &self.questions)
            .field("guard", &self.guard)
            .field("controls", &self.controls)
            .finish()
    }
}

impl<H: Host> PaginationController<H> {
    pub fn new(page_size: QuestionsPerPage) -> Self {
        Self {
            window: Window::new(page_size),
            questions: Vec::new(),
            guard: Guard::Unchecked,
            controls: None,
        }
    }

    pub fn first_visible(&self) -> usize {
        self.window.first_visible()
    }

    pub fn page_size(&self) -> usize {
        self.window.page_size()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn questions(&self) -> &[H::Element] {
        &self.questions
    }

    /// Positions the current window shows.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.window
            .visible_mask(self.questions.len())
            .into_iter()
            .enumerate()
            .filter_map(|(i, visible)| visible.then_some(i))
            .collect()
    }

    pub fn controls(&self) -> Option<&Controls<H::Element>> {
        self.controls.as_ref()
    }

    /// Whether this page is the attempt view. Computed on first call only.
    pub fn is_active(&mut self, host: &H) -> bool {
        if self.guard == Guard::Unchecked {
            let active = host.page_id().as_deref() == Some(ATTEMPT_PAGE_ID);
            debug!(active, "evaluated page guard");
            self.guard = if active { Guard::Active } else { Guard::Inactive };
        }
        self.guard == Guard::Active
    }

    fn active(&self) -> bool {
        self.guard == Guard::Active
    }

    pub fn discover_questions(&mut self, host: &H) {
        if !self.active() {
            return;
        }
        self.questions = host.query_questions();
        debug!(count = self.questions.len(), "discovered questions");
    }

    /// Show questions `[start, start + size)` and hide the rest. Does not clamp.
    pub fn apply_window(&self, host: &mut H, start: usize, size: usize) {
        if !self.active() {
            return;
        }
        let mask = visible_mask(start, size, self.questions.len());
        for (question, visible) in self.questions.iter().zip(mask) {
            host.set_hidden(question, !visible);
        }
        debug!(start, size, "applied window");
    }

    pub fn render(&self, host: &mut H) {
        self.apply_window(host, self.window.first_visible(), self.window.page_size());
    }

    pub fn step_forward(&mut self) -> usize {
        if !self.active() {
            return self.window.first_visible();
        }
        self.window.step_forward(self.questions.len())
    }

    pub fn step_backward(&mut self) -> usize {
        if !self.active() {
            return self.window.first_visible();
        }
        self.window.step_backward()
    }

    /// Full reaction to a navigation button: save, step, show, scroll.
    pub fn go(&mut self, host: &mut H, direction: Direction) {
        if !self.active() {
            return;
        }
        self.autosave(host);
        let first = match direction {
            Direction::Previous => self.step_backward(),
            Direction::Next => self.step_forward(),
        };
        debug!(?direction, first, "stepped window");
        self.render(host);
        if let Some(container) = host.question_container() {
            host.scroll_into_view(&container);
        }
    }

    fn autosave(&self, host: &mut H) {
        match host.autosave() {
            Ok(()) => {}
            Err(PaginateError::AutosaveUnavailable) => {
                debug!("no autosave hook, continuing");
            }
            Err(e) => warn!(error = %e, "autosave failed, continuing"),
        }
    }

    pub fn resolve_anchor_target_index(&self, host: &H, url: &str) -> Option<usize> {
        let ids: Vec<Option<String>> = self
            .questions
            .iter()
            .map(|q| host.element_id(q))
            .collect();
        anchor::resolve_target_index(url, ids.iter().map(|id| id.as_deref()))
    }

    /// Put the question named by `url`'s fragment first. Returns false when
    /// the fragment names no known question.
    pub fn sync_to_url(&mut self, host: &mut H, url: &str) -> bool {
        if !self.active() {
            return false;
        }
        let Some(index) = self.resolve_anchor_target_index(host, url) else {
            return false;
        };
        debug!(index, url, "window follows anchor");
        self.window.jump_to(index);
        self.render(host);
        if let Some(question) = self.questions.get(index).cloned() {
            host.scroll_into_view(&question);
        }
        true
    }

    pub fn on_hash_change(&mut self, host: &mut H, change: &HashChange) {
        if change.target_is_window {
            self.sync_to_url(host, &change.new_url);
        }
    }

    /// Follow a click inside the quiz navigation block.
    pub fn on_document_click(&mut self, host: &mut H, target: &H::Element) {
        if !self.active() {
            return;
        }
        let Some(link) = nav_link(host, target) else {
            return;
        };
        if let Some(href) = host.attribute(&link, "href") {
            self.sync_to_url(host, &href);
        }
    }

    /// Clone `source` into previous/next buttons placed just before it.
    pub fn inject_controls(
        &mut self,
        host: &mut H,
        source: &H::Element,
        previous_label: &str,
        next_label: &str,
    ) -> Controls<H::Element> {
        let previous = clone_control(host, source, PREVIOUS_CONTROL_ID, previous_label);
        let next = clone_control(host, source, NEXT_CONTROL_ID, next_label);
        let controls = Controls { previous, next };
        self.controls = Some(controls.clone());
        controls
    }
}

fn clone_control<H: Host>(host: &mut H, source: &H::Element, id: &str, label: &str) -> H::Element {
    let el = host.clone_element(source);
    host.set_element_id(&el, id);
    host.replace_class(&el, PRIMARY_CLASS, SECONDARY_CLASS);
    host.set_value(&el, label);
    host.set_attribute(&el, LABEL_ATTRIBUTE, label);
    host.insert_before(&el, source);
    el
}

/// The navigation link a click landed in, if it landed inside the
/// navigation block at all.
pub fn nav_link<H: Host>(host: &H, target: &H::Element) -> Option<H::Element> {
    let mut link = None;
    let mut in_block = false;
    let mut cursor = Some(target.clone());
    while let Some(el) = cursor {
        if link.is_none() && host.tag_name(&el) == "a" && host.has_class(&el, NAV_BUTTON_CLASS) {
            link = Some(el.clone());
        }
        if host.element_id(&el).as_deref() == Some(NAV_BLOCK_ID) {
            in_block = true;
            break;
        }
        cursor = host.parent(&el);
    }
    if in_block {
        link
    } else {
        None
    }
}

/// Start paginating the current page.
///
/// Fails only on configuration problems: an unusable `questions_per_page`
/// or a page without the button the controls are cloned from. On any other
/// page than the attempt view the returned controller stays inert.
pub fn init<H, Q>(host: &mut H, questions_per_page: Q) -> Result<SharedController<H>>
where
    H: Host,
    Q: TryInto<QuestionsPerPage, Error = PaginateError>,
{
    let per_page = questions_per_page.try_into()?;
    let mut controller = PaginationController::new(per_page);

    if !controller.is_active(host) {
        debug!("not an attempt page, staying inactive");
        return Ok(Rc::new(RefCell::new(controller)));
    }

    controller.discover_questions(host);
    if host.find_clone_source().is_none() {
        return Err(PaginateError::MissingCloneSource(CLONE_SOURCE_ID));
    }

    let url = host.current_url();
    if !controller.sync_to_url(host, &url) {
        controller.render(host);
    }
    info!(
        per_page = %per_page,
        questions = controller.question_count(),
        first = controller.first_visible(),
        "pagination ready"
    );

    let shared = Rc::new(RefCell::new(controller));

    let ctrl = Rc::clone(&shared);
    host.add_hash_change_listener(Box::new(move |host, change| {
        ctrl.borrow_mut().on_hash_change(host, change);
    }));
    let ctrl = Rc::clone(&shared);
    host.add_document_click_listener(Box::new(move |host, target| {
        ctrl.borrow_mut().on_document_click(host, target);
    }));

    let requests = vec![
        StringRequest::new("previous", STRINGS_COMPONENT),
        StringRequest::new("next", STRINGS_COMPONENT),
    ];
    let ctrl = Rc::clone(&shared);
    host.get_strings(
        requests,
        Box::new(move |host, labels| match labels {
            Ok(labels) => attach_controls(&ctrl, host, &labels),
            Err(e) => error!(error = %e, "cannot load button labels, no controls added"),
        }),
    );

    Ok(shared)
}

fn attach_controls<H: Host>(ctrl: &SharedController<H>, host: &mut H, labels: &[String]) {
    let [previous_label, next_label] = labels else {
        error!(count = labels.len(), "expected two button labels");
        return;
    };
    let Some(source) = host.find_clone_source() else {
        let e = PaginateError::MissingCloneSource(CLONE_SOURCE_ID);
        error!(error = %e, "clone source vanished before labels arrived");
        return;
    };
    let controls = ctrl
        .borrow_mut()
        .inject_controls(host, &source, previous_label, next_label);

    let handle = Rc::clone(ctrl);
    host.add_click_listener(
        &controls.previous,
        Box::new(move |host, _| handle.borrow_mut().go(host, Direction::Previous)),
    );
    let handle = Rc::clone(ctrl);
    host.add_click_listener(
        &controls.next,
        Box::new(move |host, _| handle.borrow_mut().go(host, Direction::Next)),
    );
    debug!("navigation controls attached");
}
