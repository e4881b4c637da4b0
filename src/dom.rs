//! In-memory attempt page.
//!
//! A small element tree that behaves enough like a browser document for the
//! controller: ids, classes, attributes, hidden flags, form state, click and
//! hash-change listeners, and a string service whose answers arrive only
//! when [`Document::resolve_pending_strings`] is called.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::error::{PaginateError, Result};
use crate::host::{
    ClickHandler, HashChange, HashChangeHandler, Host, StringRequest, StringsCallback,
    CLONE_SOURCE_ID, CONTAINER_ID, HIDDEN_CLASS,
};
use crate::lang::StringTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub value: Option<String>,
    pub checked: bool,
    pub hidden: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

type AutosaveHook = Box<dyn FnMut(&Document) -> std::result::Result<(), String>>;

pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
    url: String,
    strings: StringTable,
    pending_strings: VecDeque<(Vec<StringRequest>, StringsCallback<Document>)>,
    click_listeners: HashMap<NodeId, Vec<Option<ClickHandler<Document>>>>,
    document_click_listeners: Vec<Option<ClickHandler<Document>>>,
    hash_listeners: Vec<Option<HashChangeHandler<Document>>>,
    autosave_hook: Option<AutosaveHook>,
    scrolled: Vec<NodeId>,
}

impl Document {
    pub fn new(url: &str) -> Self {
        let body = Node {
            tag: "body".to_string(),
            ..Node::default()
        };
        Self {
            nodes: vec![body],
            body: NodeId(0),
            url: url.to_string(),
            strings: StringTable::english(),
            pending_strings: VecDeque::new(),
            click_listeners: HashMap::new(),
            document_click_listeners: Vec::new(),
            hash_listeners: Vec::new(),
            autosave_hook: None,
            scrolled: Vec::new(),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn set_strings(&mut self, strings: StringTable) {
        self.strings = strings;
    }

    pub fn set_autosave_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&Document) -> std::result::Result<(), String> + 'static,
    {
        self.autosave_hook = Some(Box::new(hook));
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old) = self.nodes[child.0].parent.take() {
            self.nodes[old.0].children.retain(|&c| c != child);
        }
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        let classes = &mut self.nodes[id.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        self.nodes[id.0].classes.retain(|c| c != class);
    }

    /// Space-separated class list, as `className` would show it.
    pub fn class_name(&self, id: NodeId) -> String {
        self.nodes[id.0].classes.join(" ")
    }

    /// Attached elements in document order, starting at the body.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if self.nodes[self.body.0].id.as_deref() == Some(id) {
            return Some(self.body);
        }
        self.descendants(self.body)
            .into_iter()
            .find(|n| self.nodes[n.0].id.as_deref() == Some(id))
    }

    /// Hidden itself or inside a hidden ancestor.
    pub fn is_hidden(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            if self.nodes[n.0].hidden {
                return true;
            }
            cursor = self.nodes[n.0].parent;
        }
        false
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Change the address. A change that only touches the fragment raises a
    /// hash-change on the window, as a browser would.
    pub fn navigate(&mut self, url: &str) {
        let before = self.url.split('#').next().unwrap_or_default().to_string();
        let after = url.split('#').next().unwrap_or_default();
        let fragment_only = before == after && self.url != url;
        self.url = url.to_string();
        if fragment_only {
            let change = HashChange {
                new_url: url.to_string(),
                target_is_window: true,
            };
            self.dispatch_hash_change(&change);
        }
    }

    pub fn dispatch_hash_change(&mut self, change: &HashChange) {
        for i in 0..self.hash_listeners.len() {
            if let Some(mut handler) = self.hash_listeners[i].take() {
                handler(self, change);
                self.hash_listeners[i] = Some(handler);
            }
        }
    }

    /// Click `target`: its own listeners first, then the document's.
    pub fn click(&mut self, target: NodeId) {
        let count = self.click_listeners.get(&target).map_or(0, Vec::len);
        for i in 0..count {
            let taken = self
                .click_listeners
                .get_mut(&target)
                .and_then(|handlers| handlers[i].take());
            if let Some(mut handler) = taken {
                handler(self, &target);
                if let Some(handlers) = self.click_listeners.get_mut(&target) {
                    handlers[i] = Some(handler);
                }
            }
        }
        for i in 0..self.document_click_listeners.len() {
            if let Some(mut handler) = self.document_click_listeners[i].take() {
                handler(self, &target);
                self.document_click_listeners[i] = Some(handler);
            }
        }
    }

    pub fn click_listener_count(&self, target: NodeId) -> usize {
        self.click_listeners.get(&target).map_or(0, Vec::len)
    }

    pub fn pending_string_requests(&self) -> usize {
        self.pending_strings.len()
    }

    /// Answer every queued string lookup from the string table.
    pub fn resolve_pending_strings(&mut self) -> usize {
        let mut resolved = 0;
        while let Some((requests, done)) = self.pending_strings.pop_front() {
            let result = self.strings.resolve(&requests);
            done(self, result);
            resolved += 1;
        }
        resolved
    }

    /// Fail every queued string lookup with `reason`.
    pub fn fail_pending_strings(&mut self, reason: &str) {
        while let Some((_, done)) = self.pending_strings.pop_front() {
            done(self, Err(PaginateError::Strings(reason.to_string())));
        }
    }

    /// Elements scrolled into view so far, oldest first.
    pub fn scrolled(&self) -> &[NodeId] {
        &self.scrolled
    }

    /// Checked inputs inside `root`, as `(name, value)` pairs.
    pub fn checked_inputs(&self, root: NodeId) -> Vec<(String, String)> {
        self.descendants(root)
            .into_iter()
            .map(|id| &self.nodes[id.0])
            .filter(|n| n.tag == "input" && n.checked)
            .filter_map(|n| {
                let name = n.attributes.get("name")?.clone();
                Some((name, n.value.clone().unwrap_or_default()))
            })
            .collect()
    }

    fn copy_subtree(&mut self, src: NodeId) -> NodeId {
        let mut copy = self.nodes[src.0].clone();
        copy.parent = None;
        copy.children = Vec::new();
        self.nodes.push(copy);
        let new = NodeId(self.nodes.len() - 1);
        for child in self.nodes[src.0].children.clone() {
            let child_copy = self.copy_subtree(child);
            self.append_child(new, child_copy);
        }
        new
    }
}

impl Host for Document {
    type Element = NodeId;

    fn page_id(&self) -> Option<String> {
        self.nodes[self.body.0].id.clone()
    }

    fn query_questions(&self) -> Vec<NodeId> {
        if self.page_id().as_deref() != Some(crate::host::ATTEMPT_PAGE_ID) {
            return Vec::new();
        }
        let Some(form) = self.get_element_by_id(CONTAINER_ID) else {
            return Vec::new();
        };
        self.descendants(form)
            .into_iter()
            .filter(|&n| self.has_class(&n, "que"))
            .collect()
    }

    fn question_container(&self) -> Option<NodeId> {
        self.get_element_by_id(CONTAINER_ID)
    }

    fn find_clone_source(&self) -> Option<NodeId> {
        self.get_element_by_id(CLONE_SOURCE_ID)
    }

    fn element_id(&self, el: &NodeId) -> Option<String> {
        self.nodes[el.0].id.clone()
    }

    fn set_element_id(&mut self, el: &NodeId, id: &str) {
        self.nodes[el.0].id = Some(id.to_string());
    }

    fn tag_name(&self, el: &NodeId) -> String {
        self.nodes[el.0].tag.clone()
    }

    fn has_class(&self, el: &NodeId, class: &str) -> bool {
        self.nodes[el.0].classes.iter().any(|c| c == class)
    }

    fn replace_class(&mut self, el: &NodeId, from: &str, to: &str) {
        let classes = &mut self.nodes[el.0].classes;
        match classes.iter().position(|c| c == from) {
            Some(pos) => classes[pos] = to.to_string(),
            None => classes.push(to.to_string()),
        }
        let mut seen = Vec::new();
        classes.retain(|c| {
            let first = !seen.contains(c);
            seen.push(c.clone());
            first
        });
    }

    fn attribute(&self, el: &NodeId, name: &str) -> Option<String> {
        let node = &self.nodes[el.0];
        match name {
            "id" => node.id.clone(),
            "class" => Some(node.classes.join(" ")),
            "value" => node.value.clone(),
            _ => node.attributes.get(name).cloned(),
        }
    }

    fn set_attribute(&mut self, el: &NodeId, name: &str, value: &str) {
        self.nodes[el.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn set_value(&mut self, el: &NodeId, value: &str) {
        self.nodes[el.0].value = Some(value.to_string());
    }

    fn set_hidden(&mut self, el: &NodeId, hidden: bool) {
        self.nodes[el.0].hidden = hidden;
        if hidden {
            self.add_class(*el, HIDDEN_CLASS);
        } else {
            self.remove_class(*el, HIDDEN_CLASS);
        }
    }

    fn parent(&self, el: &NodeId) -> Option<NodeId> {
        self.nodes[el.0].parent
    }

    fn clone_element(&mut self, el: &NodeId) -> NodeId {
        self.copy_subtree(*el)
    }

    fn insert_before(&mut self, new: &NodeId, reference: &NodeId) {
        let Some(parent) = self.nodes[reference.0].parent else {
            return;
        };
        self.detach(*new);
        let siblings = &mut self.nodes[parent.0].children;
        let pos = siblings
            .iter()
            .position(|c| c == reference)
            .unwrap_or(siblings.len());
        siblings.insert(pos, *new);
        self.nodes[new.0].parent = Some(parent);
    }

    fn scroll_into_view(&mut self, el: &NodeId) {
        self.scrolled.push(*el);
    }

    fn current_url(&self) -> String {
        self.url.clone()
    }

    fn autosave(&mut self) -> Result<()> {
        let Some(mut hook) = self.autosave_hook.take() else {
            return Err(PaginateError::AutosaveUnavailable);
        };
        let outcome = hook(&*self);
        self.autosave_hook = Some(hook);
        outcome.map_err(PaginateError::Autosave)
    }

    fn add_click_listener(&mut self, el: &NodeId, handler: ClickHandler<Self>) {
        self.click_listeners.entry(*el).or_default().push(Some(handler));
    }

    fn add_document_click_listener(&mut self, handler: ClickHandler<Self>) {
        self.document_click_listeners.push(Some(handler));
    }

    fn add_hash_change_listener(&mut self, handler: HashChangeHandler<Self>) {
        self.hash_listeners.push(Some(handler));
    }

    fn get_strings(&mut self, requests: Vec<StringRequest>, done: StringsCallback<Self>) {
        self.pending_strings.push_back((requests, done));
    }
}
