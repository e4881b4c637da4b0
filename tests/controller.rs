use std::cell::RefCell;
use std::rc::Rc;

use quizpaginate::controller::{self, LABEL_ATTRIBUTE, PRIMARY_CLASS, SECONDARY_CLASS};
use quizpaginate::host::{HashChange, NEXT_CONTROL_ID, PREVIOUS_CONTROL_ID};
use quizpaginate::lang::StringTable;
use quizpaginate::model::Quiz;
use quizpaginate::page::AttemptPage;
use quizpaginate::{Host, PaginateError};

fn quiz(count: u32) -> Quiz {
    let mut md = String::from("# Practice quiz\n\n");
    for n in 1..=count {
        md.push_str(&format!(
            "## {}. Question {}\n\nPick one.\n\n- [ ] yes\n- [ ] no\n\n",
            n, n
        ));
    }
    quizpaginate::parser::parse_quiz(&md, "practice.md", "sha256:test").unwrap()
}

fn page(count: u32) -> AttemptPage {
    AttemptPage::build(&quiz(count), None)
}

fn page_at(count: u32, url: &str) -> AttemptPage {
    AttemptPage::build(&quiz(count), Some(url))
}

fn click_next(page: &mut AttemptPage) {
    let next = page.document.get_element_by_id(NEXT_CONTROL_ID).unwrap();
    page.document.click(next);
}

fn click_previous(page: &mut AttemptPage) {
    let prev = page.document.get_element_by_id(PREVIOUS_CONTROL_ID).unwrap();
    page.document.click(prev);
}

#[test]
fn test_init_shows_first_window() {
    let mut page = page(10);
    let ctrl = quizpaginate::init(&mut page.document, "3").unwrap();

    assert_eq!(ctrl.borrow().question_count(), 10);
    assert_eq!(ctrl.borrow().first_visible(), 0);
    assert_eq!(page.visible_questions(), vec![0, 1, 2]);
    assert!(ctrl.borrow_mut().is_active(&page.document));
}

#[test]
fn test_default_setting_shows_one_question() {
    let mut page = page(4);
    let setting = quizpaginate::config::questions_per_page_setting(None);
    quizpaginate::init(&mut page.document, setting.as_str()).unwrap();
    assert_eq!(page.visible_questions(), vec![0]);
}

#[test]
fn test_controls_wait_for_labels() {
    let mut page = page(5);
    let ctrl = quizpaginate::init(&mut page.document, "2").unwrap();

    assert!(page.document.get_element_by_id(PREVIOUS_CONTROL_ID).is_none());
    assert!(page.document.get_element_by_id(NEXT_CONTROL_ID).is_none());
    assert!(ctrl.borrow().controls().is_none());
    assert_eq!(page.document.pending_string_requests(), 1);

    assert_eq!(page.document.resolve_pending_strings(), 1);
    assert!(ctrl.borrow().controls().is_some());
    assert!(page.document.get_element_by_id(PREVIOUS_CONTROL_ID).is_some());
}

#[test]
fn test_injected_controls_look_secondary() {
    let mut page = page(5);
    let ctrl = quizpaginate::init(&mut page.document, "2").unwrap();
    page.document.resolve_pending_strings();

    let controls = ctrl.borrow().controls().cloned().unwrap();
    let doc = &page.document;
    assert_ne!(controls.previous, controls.next);
    assert_eq!(doc.element_id(&controls.previous).as_deref(), Some(PREVIOUS_CONTROL_ID));
    assert_eq!(doc.element_id(&controls.next).as_deref(), Some(NEXT_CONTROL_ID));

    for (button, label) in [(controls.previous, "Previous page"), (controls.next, "Next page")] {
        assert!(doc.has_class(&button, SECONDARY_CLASS));
        assert!(!doc.has_class(&button, PRIMARY_CLASS));
        assert!(doc.has_class(&button, "mod_quiz-next-nav"));
        assert_eq!(doc.attribute(&button, "value").as_deref(), Some(label));
        assert_eq!(doc.attribute(&button, LABEL_ATTRIBUTE).as_deref(), Some(label));
        assert_eq!(doc.click_listener_count(button), 1);
    }

    // the finish button keeps its look and stays last
    assert!(doc.has_class(&page.finish_button, PRIMARY_CLASS));
    assert_eq!(
        page.buttons(),
        vec![controls.previous, controls.next, page.finish_button]
    );
}

#[test]
fn test_translated_labels() {
    let mut page = page(3);
    let mut strings = StringTable::english();
    strings.insert("moodle", "previous", "Zurück");
    strings.insert("moodle", "next", "Weiter");
    page.document.set_strings(strings);

    quizpaginate::init(&mut page.document, "1").unwrap();
    page.document.resolve_pending_strings();

    let next = page.document.get_element_by_id(NEXT_CONTROL_ID).unwrap();
    assert_eq!(page.document.attribute(&next, "value").as_deref(), Some("Weiter"));
}

#[test]
fn test_buttons_step_through_the_quiz() {
    let mut page = page(10);
    let ctrl = quizpaginate::init(&mut page.document, "3").unwrap();
    page.document.resolve_pending_strings();

    let mut firsts = Vec::new();
    for _ in 0..3 {
        click_next(&mut page);
        firsts.push(ctrl.borrow().first_visible());
    }
    assert_eq!(firsts, vec![3, 6, 7]);
    assert_eq!(page.visible_questions(), vec![7, 8, 9]);

    firsts.clear();
    for _ in 0..3 {
        click_previous(&mut page);
        firsts.push(ctrl.borrow().first_visible());
    }
    assert_eq!(firsts, vec![4, 1, 0]);
    assert_eq!(page.visible_questions(), vec![0, 1, 2]);
}

#[test]
fn test_next_on_short_quiz_keeps_everything_shown() {
    let mut page = page(2);
    let ctrl = quizpaginate::init(&mut page.document, "5").unwrap();
    page.document.resolve_pending_strings();

    click_next(&mut page);
    assert_eq!(ctrl.borrow().first_visible(), 0);
    assert_eq!(page.visible_questions(), vec![0, 1]);
}

#[test]
fn test_stepping_scrolls_to_the_form() {
    let mut page = page(6);
    quizpaginate::init(&mut page.document, "2").unwrap();
    page.document.resolve_pending_strings();

    click_next(&mut page);
    let form = page.document.question_container().unwrap();
    assert_eq!(page.document.scrolled().last(), Some(&form));
}

#[test]
fn test_autosave_runs_before_the_step() {
    let mut page = page(6);
    let questions = page.questions.clone();
    let seen: Rc<RefCell<Vec<Vec<usize>>>> = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    page.document.set_autosave_hook(move |doc| {
        let visible: Vec<usize> = (0..questions.len())
            .filter(|&i| !doc.is_hidden(questions[i]))
            .collect();
        log.borrow_mut().push(visible);
        Ok(())
    });

    quizpaginate::init(&mut page.document, "2").unwrap();
    page.document.resolve_pending_strings();
    click_next(&mut page);
    click_previous(&mut page);

    assert_eq!(*seen.borrow(), vec![vec![0, 1], vec![2, 3]]);
}

#[test]
fn test_failing_autosave_does_not_block_navigation() {
    let mut page = page(6);
    page.document
        .set_autosave_hook(|_| Err("session expired".to_string()));
    let ctrl = quizpaginate::init(&mut page.document, "2").unwrap();
    page.document.resolve_pending_strings();

    click_next(&mut page);
    assert_eq!(ctrl.borrow().first_visible(), 2);
    assert_eq!(page.visible_questions(), vec![2, 3]);
}

#[test]
fn test_initial_anchor_moves_window() {
    let mut page = page_at(10, "/mod/quiz/attempt.php?attempt=1#question-1-5");
    let ctrl = quizpaginate::init(&mut page.document, "3").unwrap();

    assert_eq!(ctrl.borrow().first_visible(), 4);
    assert_eq!(page.visible_questions(), vec![4, 5, 6]);
    assert_eq!(page.document.scrolled().last(), Some(&page.questions[4]));
}

#[test]
fn test_unknown_anchor_falls_back_to_start() {
    let mut page = page_at(10, "/mod/quiz/attempt.php?attempt=1#question-1-99");
    let ctrl = quizpaginate::init(&mut page.document, "3").unwrap();
    assert_eq!(ctrl.borrow().first_visible(), 0);
    assert_eq!(page.visible_questions(), vec![0, 1, 2]);
}

#[test]
fn test_anchor_near_the_end_is_not_clamped() {
    let mut page = page_at(10, "/mod/quiz/attempt.php?attempt=1#question-1-9");
    let ctrl = quizpaginate::init(&mut page.document, "3").unwrap();
    assert_eq!(ctrl.borrow().first_visible(), 8);
    assert_eq!(page.visible_questions(), vec![8, 9]);
}

#[test]
fn test_hash_change_follows_fragment() {
    let mut page = page(10);
    let ctrl = quizpaginate::init(&mut page.document, "3").unwrap();

    page.document
        .navigate("/mod/quiz/attempt.php?attempt=1#question-1-7");
    assert_eq!(ctrl.borrow().first_visible(), 6);
    assert_eq!(page.visible_questions(), vec![6, 7, 8]);
}

#[test]
fn test_hash_change_not_on_window_is_ignored() {
    let mut page = page(10);
    let ctrl = quizpaginate::init(&mut page.document, "3").unwrap();

    page.document.dispatch_hash_change(&HashChange {
        new_url: "/mod/quiz/attempt.php?attempt=1#question-1-7".to_string(),
        target_is_window: false,
    });
    assert_eq!(ctrl.borrow().first_visible(), 0);
}

#[test]
fn test_navigation_block_click_follows_link() {
    let mut page = page(10);
    let ctrl = quizpaginate::init(&mut page.document, "3").unwrap();

    let link = page.nav_links[7];
    let number = page.document.children(link)[0];
    assert_eq!(controller::nav_link(&page.document, &number), Some(link));

    page.document.click(number);
    assert_eq!(ctrl.borrow().first_visible(), 7);
    assert_eq!(page.visible_questions(), vec![7, 8, 9]);
}

#[test]
fn test_clicks_outside_navigation_block_are_ignored() {
    let mut page = page(10);
    let ctrl = quizpaginate::init(&mut page.document, "3").unwrap();

    // a lookalike link inside the form
    let form = page.document.question_container().unwrap();
    let stray = page.document.create_element("a");
    page.document.add_class(stray, "qnbutton");
    page.document
        .set_attribute(&stray, "href", "/mod/quiz/attempt.php?attempt=1#question-1-5");
    page.document.append_child(form, stray);

    assert_eq!(controller::nav_link(&page.document, &stray), None);
    page.document.click(stray);
    page.document.click(page.questions[1]);
    assert_eq!(ctrl.borrow().first_visible(), 0);
}

#[test]
fn test_invalid_setting_is_rejected() {
    for bad in ["abc", "0", "2.5", "-3"] {
        let mut page = page(4);
        let err = quizpaginate::init(&mut page.document, bad).unwrap_err();
        assert!(matches!(err, PaginateError::InvalidQuestionsPerPage(_)));
        // nothing was touched
        assert_eq!(page.visible_questions(), vec![0, 1, 2, 3]);
        assert_eq!(page.document.pending_string_requests(), 0);
    }
}

#[test]
fn test_missing_clone_source_is_an_error() {
    let mut page = page(4);
    page.document.node_mut(page.finish_button).id = None;

    let err = quizpaginate::init(&mut page.document, "2").unwrap_err();
    assert!(matches!(err, PaginateError::MissingCloneSource(_)));
    assert!(err.is_configuration());
}

#[test]
fn test_clone_source_gone_before_labels_arrive() {
    let mut page = page(4);
    let ctrl = quizpaginate::init(&mut page.document, "2").unwrap();
    page.document.node_mut(page.finish_button).id = None;

    page.document.resolve_pending_strings();
    assert!(ctrl.borrow().controls().is_none());
    assert!(page.document.get_element_by_id(NEXT_CONTROL_ID).is_none());
}

#[test]
fn test_failed_label_lookup_leaves_pagination_running() {
    let mut page = page(6);
    let ctrl = quizpaginate::init(&mut page.document, "2").unwrap();
    page.document.fail_pending_strings("offline");

    assert!(ctrl.borrow().controls().is_none());
    assert_eq!(page.buttons(), vec![page.finish_button]);

    page.document
        .navigate("/mod/quiz/attempt.php?attempt=1#question-1-4");
    assert_eq!(page.visible_questions(), vec![3, 4]);
}

#[test]
fn test_other_pages_are_left_alone() {
    let mut page = page(4);
    let body = page.document.body();
    page.document.node_mut(body).id = Some("page-mod-quiz-review".to_string());

    let ctrl = quizpaginate::init(&mut page.document, "1").unwrap();
    assert!(!ctrl.borrow_mut().is_active(&page.document));
    assert_eq!(ctrl.borrow().question_count(), 0);
    assert_eq!(page.visible_questions(), vec![0, 1, 2, 3]);
    assert_eq!(page.document.pending_string_requests(), 0);

    assert_eq!(ctrl.borrow_mut().step_forward(), 0);
    page.document
        .navigate("/mod/quiz/attempt.php?attempt=1#question-1-3");
    assert_eq!(page.visible_questions(), vec![0, 1, 2, 3]);
}

#[test]
fn test_apply_window_twice_is_stable() {
    let mut page = page(7);
    let ctrl = quizpaginate::init(&mut page.document, "3").unwrap();

    ctrl.borrow().apply_window(&mut page.document, 2, 3);
    let once: Vec<String> = page
        .questions
        .iter()
        .map(|&q| page.document.class_name(q))
        .collect();
    ctrl.borrow().apply_window(&mut page.document, 2, 3);
    let twice: Vec<String> = page
        .questions
        .iter()
        .map(|&q| page.document.class_name(q))
        .collect();

    assert_eq!(once, twice);
    assert_eq!(page.visible_questions(), vec![2, 3, 4]);
}

#[test]
fn test_visible_indices_match_the_page() {
    let mut page = page(8);
    let ctrl = quizpaginate::init(&mut page.document, "3").unwrap();
    page.document.resolve_pending_strings();

    click_next(&mut page);
    assert_eq!(ctrl.borrow().visible_indices(), vec![3, 4, 5]);
    assert_eq!(ctrl.borrow().visible_indices(), page.visible_questions());
}

#[test]
fn test_huge_setting_keeps_every_question_shown() {
    let mut page = page(10);
    let ctrl = quizpaginate::init(&mut page.document, "9223372036854775809").unwrap();
    page.document.resolve_pending_strings();

    click_next(&mut page);
    assert_eq!(ctrl.borrow().first_visible(), 0);
    assert_eq!(page.visible_questions(), (0..10).collect::<Vec<_>>());
}

#[test]
fn test_guard_keeps_first_answer_after_marker_removed() {
    let mut page = page(6);
    let ctrl = quizpaginate::init(&mut page.document, "2").unwrap();
    page.document.resolve_pending_strings();

    let body = page.document.body();
    page.document.node_mut(body).id = Some("page-mod-quiz-review".to_string());

    assert!(ctrl.borrow_mut().is_active(&page.document));
    click_next(&mut page);
    assert_eq!(ctrl.borrow().first_visible(), 2);
    assert_eq!(page.visible_questions(), vec![2, 3]);
}

#[test]
fn test_guard_keeps_first_answer_after_marker_added() {
    let mut page = page(6);
    let body = page.document.body();
    page.document.node_mut(body).id = None;

    let ctrl = quizpaginate::init(&mut page.document, "2").unwrap();
    page.document.node_mut(body).id = Some("page-mod-quiz-attempt".to_string());

    assert!(!ctrl.borrow_mut().is_active(&page.document));
    ctrl.borrow_mut().discover_questions(&page.document);
    assert_eq!(ctrl.borrow().question_count(), 0);
    assert_eq!(ctrl.borrow_mut().step_forward(), 0);
    ctrl.borrow_mut().go(&mut page.document, quizpaginate::Direction::Next);
    assert_eq!(page.visible_questions(), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(page.document.pending_string_requests(), 0);
}
