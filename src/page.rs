//! Lays a parsed quiz out as a one-page attempt view.

use crate::dom::{Document, NodeId};
use crate::host::{
    Host, ATTEMPT_PAGE_ID, CLONE_SOURCE_ID, CONTAINER_ID, NAV_BLOCK_ID, NAV_BUTTON_CLASS,
};
use crate::model::{Question, QuestionKind, Quiz, SavedInput};

pub const DEFAULT_ATTEMPT: u64 = 1;
pub const ATTEMPT_PATH: &str = "/mod/quiz/attempt.php";

/// `question-<attempt>-<slot>`
pub fn question_element_id(attempt: u64, slot: u32) -> String {
    format!("question-{}-{}", attempt, slot)
}

/// Form field name for a question's answer.
pub fn answer_input_name(attempt: u64, slot: u32) -> String {
    format!("q{}:{}_answer", attempt, slot)
}

pub fn attempt_url(attempt: u64) -> String {
    format!("{}?attempt={}", ATTEMPT_PATH, attempt)
}

pub struct AttemptPage {
    pub document: Document,
    pub attempt: u64,
    /// The `.que` element of each question, in quiz order.
    pub questions: Vec<NodeId>,
    /// The `a.qnbutton` of each question, in quiz order.
    pub nav_links: Vec<NodeId>,
    pub finish_button: NodeId,
}

impl AttemptPage {
    pub fn build(quiz: &Quiz, url: Option<&str>) -> Self {
        let attempt = quiz.frontmatter.attempt.unwrap_or(DEFAULT_ATTEMPT);
        let default_url = attempt_url(attempt);
        let mut doc = Document::new(url.unwrap_or(&default_url));
        let body = doc.body();
        doc.node_mut(body).id = Some(ATTEMPT_PAGE_ID.to_string());
        doc.add_class(body, "block_quizonepagepaginate");

        let nav_block = doc.create_element("section");
        doc.set_element_id(&nav_block, NAV_BLOCK_ID);
        doc.add_class(nav_block, "block");
        doc.append_child(body, nav_block);

        let form = doc.create_element("form");
        doc.set_element_id(&form, CONTAINER_ID);
        doc.append_child(body, form);

        let mut questions = Vec::with_capacity(quiz.questions.len());
        let mut nav_links = Vec::with_capacity(quiz.questions.len());
        for question in &quiz.questions {
            questions.push(append_question(&mut doc, form, attempt, question));

            let link = doc.create_element("a");
            doc.add_class(link, NAV_BUTTON_CLASS);
            doc.add_class(link, "btn");
            let href = format!(
                "{}#{}",
                attempt_url(attempt),
                question_element_id(attempt, question.number)
            );
            doc.set_attribute(&link, "href", &href);
            // clicks land on the inner span, as on the real navigation block
            let label = doc.create_element("span");
            doc.add_class(label, "qnnumber");
            doc.node_mut(label).text = question.number.to_string();
            doc.append_child(link, label);
            doc.append_child(nav_block, link);
            nav_links.push(link);
        }

        let buttons = doc.create_element("div");
        doc.add_class(buttons, "submitbtns");
        doc.append_child(form, buttons);
        let finish_button = doc.create_element("input");
        doc.set_element_id(&finish_button, CLONE_SOURCE_ID);
        for class in ["mod_quiz-next-nav", "btn", "btn-primary"] {
            doc.add_class(finish_button, class);
        }
        doc.set_attribute(&finish_button, "type", "submit");
        doc.set_attribute(&finish_button, "name", "next");
        doc.set_value(&finish_button, "Finish attempt ...");
        doc.append_child(buttons, finish_button);

        Self {
            document: doc,
            attempt,
            questions,
            nav_links,
            finish_button,
        }
    }

    /// Answer inputs of the question at `index`.
    pub fn choice_inputs(&self, index: usize) -> Vec<NodeId> {
        let Some(&question) = self.questions.get(index) else {
            return Vec::new();
        };
        self.document
            .descendants(question)
            .into_iter()
            .filter(|&n| self.document.node(n).tag == "input")
            .collect()
    }

    /// Click a choice the way a browser would: radios clear their group,
    /// checkboxes flip.
    pub fn toggle_choice(&mut self, index: usize, choice: usize) -> bool {
        let inputs = self.choice_inputs(index);
        let Some(&input) = inputs.get(choice) else {
            return false;
        };
        let is_radio = self.document.attribute(&input, "type").as_deref() == Some("radio");
        if is_radio {
            for &other in &inputs {
                self.document.node_mut(other).checked = other == input;
            }
        } else {
            let node = self.document.node_mut(input);
            node.checked = !node.checked;
        }
        true
    }

    pub fn checked_inputs(&self) -> Vec<SavedInput> {
        saved_inputs(&self.document)
    }

    /// Buttons in the submit row, left to right.
    pub fn buttons(&self) -> Vec<NodeId> {
        match self.document.parent(&self.finish_button) {
            Some(row) => self.document.children(row).to_vec(),
            None => vec![self.finish_button],
        }
    }

    /// Positions of the questions currently shown.
    pub fn visible_questions(&self) -> Vec<usize> {
        (0..self.questions.len())
            .filter(|&i| !self.document.is_hidden(self.questions[i]))
            .collect()
    }

    /// Re-check previously saved inputs. Unknown entries are skipped.
    pub fn restore_inputs(&mut self, saved: &[SavedInput]) -> usize {
        let mut restored = 0;
        for q in 0..self.questions.len() {
            for input in self.choice_inputs(q) {
                let node = self.document.node(input);
                let name = node.attributes.get("name").cloned().unwrap_or_default();
                let value = node.value.clone().unwrap_or_default();
                if saved.iter().any(|s| s.name == name && s.value == value) {
                    self.document.node_mut(input).checked = true;
                    restored += 1;
                }
            }
        }
        restored
    }
}

fn append_question(doc: &mut Document, form: NodeId, attempt: u64, question: &Question) -> NodeId {
    let que = doc.create_element("div");
    doc.set_element_id(&que, &question_element_id(attempt, question.number));
    doc.add_class(que, "que");
    doc.add_class(
        que,
        match question.kind {
            QuestionKind::SingleChoice(_) | QuestionKind::MultiChoice(_) => "multichoice",
            QuestionKind::Short => "shortanswer",
            QuestionKind::Long => "essay",
        },
    );
    doc.node_mut(que).text = question.title.clone();
    doc.append_child(form, que);

    let input_type = match question.kind {
        QuestionKind::MultiChoice(_) => "checkbox",
        _ => "radio",
    };
    let name = answer_input_name(attempt, question.number);
    for choice in question.kind.choices() {
        let input = doc.create_element("input");
        doc.set_attribute(&input, "type", input_type);
        doc.set_attribute(&input, "name", &name);
        doc.set_value(&input, &choice.label.to_string());
        doc.node_mut(input).text = choice.text.clone();
        doc.append_child(que, input);
    }
    que
}

/// What autosave stores: every checked input of the response form.
pub fn saved_inputs(doc: &Document) -> Vec<SavedInput> {
    let Some(form) = doc.question_container() else {
        return Vec::new();
    };
    doc.checked_inputs(form)
        .into_iter()
        .map(|(name, value)| SavedInput { name, value })
        .collect()
}
