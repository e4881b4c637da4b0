use proptest::prelude::*;

use quizpaginate::window::visible_mask;
use quizpaginate::{PaginateError, QuestionsPerPage, Window};

fn window(size: usize) -> Window {
    Window::new(QuestionsPerPage::new(size).unwrap())
}

fn shown(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter(|(_, v)| **v)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn test_forward_then_backward_round_trip() {
    let mut w = window(3);
    let forward: Vec<usize> = (0..3).map(|_| w.step_forward(10)).collect();
    assert_eq!(forward, vec![3, 6, 7]);
    assert_eq!(shown(&w.visible_mask(10)), vec![7, 8, 9]);

    let backward: Vec<usize> = (0..3).map(|_| w.step_backward()).collect();
    assert_eq!(backward, vec![4, 1, 0]);
    assert_eq!(shown(&w.visible_mask(10)), vec![0, 1, 2]);
}

#[test]
fn test_forward_on_short_quiz_stays_at_zero() {
    let mut w = window(5);
    assert_eq!(w.step_forward(2), 0);
    assert_eq!(w.step_forward(2), 0);
    assert_eq!(shown(&w.visible_mask(2)), vec![0, 1]);
}

#[test]
fn test_forward_exactly_one_page() {
    let mut w = window(4);
    assert_eq!(w.step_forward(4), 0);
}

#[test]
fn test_huge_page_size_does_not_overflow() {
    let mut w = Window::new(QuestionsPerPage::try_from("18446744073709551615").unwrap());
    assert_eq!(w.step_forward(10), 0);
    assert_eq!(shown(&w.visible_mask(10)).len(), 10);

    let mut w = Window::new(QuestionsPerPage::try_from("9223372036854775809").unwrap());
    assert_eq!(w.step_forward(10), 0);
    assert_eq!(w.step_forward(10), 0);
    assert_eq!(w.step_backward(), 0);

    let mut w = window(usize::MAX);
    w.jump_to(usize::MAX - 1);
    assert_eq!(w.step_forward(10), 0);
}

#[test]
fn test_backward_at_start_is_noop() {
    let mut w = window(2);
    assert_eq!(w.step_backward(), 0);
}

#[test]
fn test_jump_to_is_not_clamped() {
    let mut w = window(3);
    w.jump_to(8);
    assert_eq!(w.first_visible(), 8);
    assert_eq!(shown(&w.visible_mask(10)), vec![8, 9]);
}

#[test]
fn test_visible_mask_past_the_end() {
    assert_eq!(visible_mask(12, 3, 10), vec![false; 10]);
    assert!(visible_mask(0, 3, 0).is_empty());
}

#[test]
fn test_questions_per_page_parsing() {
    assert_eq!(QuestionsPerPage::try_from("3").unwrap().get(), 3);
    assert_eq!(QuestionsPerPage::try_from(" 2 ").unwrap().get(), 2);
    assert_eq!(QuestionsPerPage::try_from("4.0").unwrap().get(), 4);
    assert_eq!(QuestionsPerPage::try_from(5.0_f64).unwrap().get(), 5);
    assert_eq!(QuestionsPerPage::default().get(), 1);

    for bad in ["abc", "0", "-1", "2.5", "", "NaN", "inf"] {
        let err = QuestionsPerPage::try_from(bad).unwrap_err();
        assert!(
            matches!(err, PaginateError::InvalidQuestionsPerPage(_)),
            "{:?} gave {:?}",
            bad,
            err
        );
        assert!(err.is_configuration());
    }
    assert!(QuestionsPerPage::try_from(f64::NAN).is_err());
    assert!(QuestionsPerPage::try_from(0_i64).is_err());
}

fn page_sizes() -> impl Strategy<Value = usize> {
    prop_oneof![1usize..12, (usize::MAX - 4)..=usize::MAX, 1usize..=usize::MAX]
}

proptest! {
    #[test]
    fn prop_forward_fixpoint_is_last_full_page(total in 0usize..60, size in page_sizes()) {
        let mut w = window(size);
        let mut prev = w.first_visible();
        for _ in 0..total + 2 {
            let next = w.step_forward(total);
            if next == prev {
                break;
            }
            prev = next;
        }
        let mask = w.visible_mask(total);
        if total >= size {
            prop_assert_eq!(w.first_visible() + size, total);
            prop_assert_eq!(shown(&mask).len(), size);
        } else {
            prop_assert_eq!(w.first_visible(), 0);
            prop_assert_eq!(shown(&mask).len(), total);
        }
    }

    #[test]
    fn prop_backward_fixpoint_is_zero(start in 0usize..100, size in page_sizes()) {
        let mut w = window(size);
        w.jump_to(start);
        for _ in 0..=start {
            w.step_backward();
        }
        prop_assert_eq!(w.first_visible(), 0);
    }

    #[test]
    fn prop_forward_never_overshoots(total in 0usize..60, size in page_sizes(), steps in 0usize..20) {
        let mut w = window(size);
        for _ in 0..steps {
            let first = w.step_forward(total);
            prop_assert!(first.saturating_add(size) <= total.max(size));
        }
    }

    #[test]
    fn prop_mask_shows_at_most_page_size(start in 0usize..80, size in page_sizes(), total in 0usize..60) {
        let mask = visible_mask(start, size, total);
        prop_assert_eq!(mask.len(), total);
        let visible = shown(&mask);
        prop_assert!(visible.len() <= size);
        prop_assert!(visible.iter().all(|&i| i >= start && i < start.saturating_add(size)));
    }
}
