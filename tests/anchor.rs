use quizpaginate::anchor::{fragment, question_token, resolve_target_index};

const IDS: [Option<&str>; 6] = [
    Some("question-23-1"),
    Some("question-23-2"),
    None,
    Some("question-23-7"),
    Some("question-23-9"),
    Some("question-23-10"),
];

#[test]
fn test_resolves_fragment_to_question_position() {
    let url = "https://moodle.example/mod/quiz/attempt.php?attempt=23&cmid=4#question-23-9";
    assert_eq!(resolve_target_index(url, IDS), Some(4));
}

#[test]
fn test_unknown_question_is_none() {
    let url = "/mod/quiz/attempt.php?attempt=23#question-23-3";
    assert_eq!(resolve_target_index(url, IDS), None);
}

#[test]
fn test_no_fragment_is_none() {
    assert_eq!(resolve_target_index("/mod/quiz/attempt.php?attempt=23", IDS), None);
    assert_eq!(resolve_target_index("/mod/quiz/attempt.php#", IDS), None);
    assert_eq!(resolve_target_index("/mod/quiz/attempt.php#top", IDS), None);
}

#[test]
fn test_ids_compare_as_text() {
    // "question-23-1" must not match the prefix of "question-23-10"
    let url = "/mod/quiz/attempt.php#question-23-10";
    assert_eq!(resolve_target_index(url, IDS), Some(5));
}

#[test]
fn test_token_inside_longer_fragment() {
    assert_eq!(question_token("jump-question-5-2-end"), Some("question-5-2"));
    assert_eq!(question_token("question-x-1question-4-4"), Some("question-4-4"));
    assert_eq!(question_token("question-4-"), None);
    assert_eq!(question_token("question--4"), None);
}

#[test]
fn test_fragment_takes_first_hash() {
    assert_eq!(fragment("a#b#c"), Some("b#c"));
    assert_eq!(fragment("plain"), None);
}
