use quizpaginate::controller::Controls;
use quizpaginate::dom::{Document, NodeId};
use quizpaginate::host::Host;
use quizpaginate::model::{Question, Quiz};
use quizpaginate::page::AttemptPage;
use quizpaginate::{Direction, SharedController};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivePanel {
    Sidebar,
    Main,
}

pub struct PreviewState {
    pub quiz: Quiz,
    pub page: AttemptPage,
    pub controller: SharedController<Document>,
    /// Position of the focused question among the visible ones.
    pub focus: usize,
    pub nav_cursor: usize,
    pub active_panel: ActivePanel,
    pub should_quit: bool,
}

impl PreviewState {
    pub fn new(quiz: Quiz, page: AttemptPage, controller: SharedController<Document>) -> Self {
        let nav_cursor = controller.borrow().first_visible();
        Self {
            quiz,
            page,
            controller,
            focus: 0,
            nav_cursor,
            active_panel: ActivePanel::Main,
            should_quit: false,
        }
    }

    pub fn visible_questions(&self) -> Vec<usize> {
        self.page.visible_questions()
    }

    pub fn focused_question(&self) -> Option<usize> {
        self.visible_questions().get(self.focus).copied()
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.quiz.questions.get(index)
    }

    pub fn controls(&self) -> Option<Controls<NodeId>> {
        self.controller.borrow().controls().cloned()
    }

    /// Press the injected previous/next button, if the labels have arrived.
    pub fn press(&mut self, direction: Direction) -> bool {
        let Some(controls) = self.controls() else {
            return false;
        };
        let target = match direction {
            Direction::Previous => controls.previous,
            Direction::Next => controls.next,
        };
        self.click(target);
        true
    }

    /// Click any element of the page and resync the cursors afterwards.
    pub fn click(&mut self, target: NodeId) {
        self.page.document.click(target);
        self.after_window_change();
    }

    /// Follow the navigation link of question `index`, as a mouse click on
    /// its number would, then let the address bar pick up the fragment.
    pub fn open_nav(&mut self, index: usize) {
        let Some(&link) = self.page.nav_links.get(index) else {
            return;
        };
        let target = self
            .page
            .document
            .children(link)
            .first()
            .copied()
            .unwrap_or(link);
        self.page.document.click(target);
        if let Some(href) = self.page.document.attribute(&link, "href") {
            self.page.document.navigate(&href);
        }
        self.nav_cursor = index;
        self.after_window_change();
    }

    fn after_window_change(&mut self) {
        let visible = self.visible_questions();
        if self.focus >= visible.len() {
            self.focus = 0;
        }
        if let Some(&first) = visible.first() {
            if !visible.contains(&self.nav_cursor) {
                self.nav_cursor = first;
            }
        }
    }

    pub fn focus_next(&mut self) {
        let count = self.visible_questions().len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    /// Toggle choice `choice` (0 = a) of the focused question.
    pub fn toggle_choice(&mut self, choice: usize) -> bool {
        match self.focused_question() {
            Some(q) => self.page.toggle_choice(q, choice),
            None => false,
        }
    }

    pub fn is_checked(&self, question: usize, choice: usize) -> bool {
        self.page
            .choice_inputs(question)
            .get(choice)
            .map(|&n| self.page.document.node(n).checked)
            .unwrap_or(false)
    }

    pub fn is_answered(&self, question: usize) -> bool {
        self.page
            .choice_inputs(question)
            .iter()
            .any(|&n| self.page.document.node(n).checked)
    }

    /// "Questions 4-6 of 10"
    pub fn window_label(&self) -> String {
        let visible = self.visible_questions();
        let total = self.quiz.questions.len();
        match (visible.first(), visible.last()) {
            (Some(&a), Some(&b)) if a == b => format!("Question {} of {}", a + 1, total),
            (Some(&a), Some(&b)) => format!("Questions {}-{} of {}", a + 1, b + 1, total),
            _ => format!("{} questions", total),
        }
    }
}
