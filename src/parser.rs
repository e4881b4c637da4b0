use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::error::{PaginateError, Result};
use crate::model::*;

pub fn parse_quiz(content: &str, quiz_file: &str, quiz_hash: &str) -> Result<Quiz> {
    let (frontmatter, body) = split_frontmatter(content)?;
    let fm: Frontmatter = match frontmatter {
        Some(yaml) => serde_yaml::from_str(&yaml)?,
        None => Frontmatter::default(),
    };

    let (title, preamble, questions) = parse_body(&body)?;
    if questions.is_empty() {
        return Err(PaginateError::Quiz("no `## N. Title` questions found".to_string()));
    }

    let title = fm.title.clone().unwrap_or(title);

    Ok(Quiz {
        frontmatter: fm,
        title,
        preamble,
        questions,
        quiz_file: quiz_file.to_string(),
        quiz_hash: quiz_hash.to_string(),
    })
}

/// Frontmatter is optional here; a file that opens with `---` must close it.
fn split_frontmatter(content: &str) -> Result<(Option<String>, String)> {
    let trimmed = content.trim_start();
    let Some(after_first) = trimmed.strip_prefix("---") else {
        return Ok((None, content.to_string()));
    };

    let end_pos = after_first
        .find("\n---")
        .ok_or_else(|| PaginateError::Quiz("no closing --- for frontmatter".to_string()))?;

    let fm = after_first[..end_pos].trim().to_string();
    let body = after_first[end_pos + 4..].to_string();

    Ok((Some(fm), body))
}

#[derive(Default)]
struct PendingQuestion {
    heading: String,
    body: Vec<String>,
    choices: Vec<Choice>,
    kind: Option<QuestionKind>,
}

impl PendingQuestion {
    fn finish(self) -> Result<Question> {
        let (number, title) = parse_h2_title(&self.heading)?;
        let kind = if !self.choices.is_empty() {
            if title.contains("(Multi)") {
                QuestionKind::MultiChoice(self.choices)
            } else {
                QuestionKind::SingleChoice(self.choices)
            }
        } else {
            self.kind.unwrap_or(QuestionKind::Short)
        };
        Ok(Question {
            number,
            title,
            body_lines: self.body,
            kind,
        })
    }
}

fn parse_body(body: &str) -> Result<(String, Vec<String>, Vec<Question>)> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TASKLISTS);
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let mut title = String::new();
    let mut preamble: Vec<String> = Vec::new();
    let mut questions: Vec<Question> = Vec::new();
    let mut current: Option<PendingQuestion> = None;

    let mut in_h1 = false;
    let mut in_h2 = false;
    let mut in_blockquote = false;
    let mut blockquote_text = String::new();
    let mut in_list_item = false;
    let mut list_item_text = String::new();
    let mut task_list_checked: Option<bool> = None;
    let mut in_paragraph = false;
    let mut paragraph_text = String::new();
    let mut in_code_block = false;
    let mut code_block_text = String::new();

    for event in Parser::new_ext(body, opts) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => match level {
                HeadingLevel::H1 => in_h1 = true,
                HeadingLevel::H2 => {
                    if let Some(q) = current.take() {
                        questions.push(q.finish()?);
                    }
                    current = Some(PendingQuestion::default());
                    in_h2 = true;
                }
                _ => {}
            },
            Event::End(TagEnd::Heading(level)) => match level {
                HeadingLevel::H1 => in_h1 = false,
                HeadingLevel::H2 => in_h2 = false,
                _ => {}
            },
            Event::Start(Tag::BlockQuote(_)) => {
                in_blockquote = true;
                blockquote_text.clear();
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                in_blockquote = false;
                if let Some(q) = current.as_mut() {
                    match blockquote_text.trim() {
                        "short" => q.kind = Some(QuestionKind::Short),
                        "long" => q.kind = Some(QuestionKind::Long),
                        _ => {}
                    }
                }
            }
            Event::Start(Tag::Item) => {
                in_list_item = true;
                list_item_text.clear();
                task_list_checked = None;
            }
            Event::End(TagEnd::Item) => {
                in_list_item = false;
                if let Some(q) = current.as_mut() {
                    let text = list_item_text.trim().to_string();
                    if task_list_checked.is_some() {
                        let label = choice_label(q.choices.len()).ok_or_else(|| {
                            PaginateError::Quiz(format!(
                                "question '{}' has more than {} choices",
                                q.heading.trim(),
                                MAX_CHOICES
                            ))
                        })?;
                        q.choices.push(Choice { label, text });
                    } else if !text.is_empty() {
                        q.body.push(format!("• {}", text));
                    }
                }
                task_list_checked = None;
            }
            Event::TaskListMarker(checked) => {
                task_list_checked = Some(checked);
            }
            Event::Start(Tag::Paragraph) => {
                in_paragraph = true;
                paragraph_text.clear();
            }
            Event::End(TagEnd::Paragraph) => {
                in_paragraph = false;
                let text = paragraph_text.trim().to_string();
                if in_blockquote || in_list_item || text.is_empty() {
                    // collected by the enclosing element
                } else if let Some(q) = current.as_mut() {
                    q.body.push(text);
                } else if !in_h1 {
                    preamble.push(text);
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                code_block_text.clear();
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                if let Some(q) = current.as_mut() {
                    q.body
                        .extend(code_block_text.lines().map(|l| format!("    {}", l)));
                }
            }
            Event::Text(text) => {
                if in_h1 {
                    title.push_str(&text);
                } else if in_h2 {
                    if let Some(q) = current.as_mut() {
                        q.heading.push_str(&text);
                    }
                } else if in_code_block {
                    code_block_text.push_str(&text);
                } else if in_blockquote {
                    blockquote_text.push_str(&text);
                } else if in_list_item {
                    list_item_text.push_str(&text);
                } else if in_paragraph {
                    paragraph_text.push_str(&text);
                }
            }
            Event::Code(code) => {
                let c = format!("`{}`", code);
                if in_list_item {
                    list_item_text.push_str(&c);
                } else if in_paragraph {
                    paragraph_text.push_str(&c);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if in_paragraph {
                    paragraph_text.push(' ');
                }
            }
            _ => {}
        }
    }

    if let Some(q) = current.take() {
        questions.push(q.finish()?);
    }

    Ok((title.trim().to_string(), preamble, questions))
}

/// Choices are answered with a letter key, so `a` through `z`.
const MAX_CHOICES: usize = 26;

fn choice_label(index: usize) -> Option<char> {
    if index >= MAX_CHOICES {
        return None;
    }
    let offset = u8::try_from(index).ok()?;
    b'a'.checked_add(offset).map(char::from)
}

fn parse_h2_title(text: &str) -> Result<(u32, String)> {
    let trimmed = text.trim();
    // Expected format: "1. Title text"
    let Some((num_str, title)) = trimmed.split_once('.') else {
        return Err(PaginateError::Quiz(format!(
            "question heading must be in format '## N. Title', got: {}",
            trimmed
        )));
    };
    let number: u32 = num_str.trim().parse().map_err(|_| {
        PaginateError::Quiz(format!("invalid question number in heading: {}", trimmed))
    })?;
    Ok((number, title.trim().to_string()))
}
