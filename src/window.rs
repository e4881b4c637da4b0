use std::fmt;
use std::num::NonZeroUsize;

use crate::error::PaginateError;

/// Validated "show this many questions at a time" setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionsPerPage(NonZeroUsize);

impl QuestionsPerPage {
    pub fn new(n: usize) -> Option<Self> {
        NonZeroUsize::new(n).map(Self)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for QuestionsPerPage {
    fn default() -> Self {
        Self(NonZeroUsize::MIN)
    }
}

impl fmt::Display for QuestionsPerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for QuestionsPerPage {
    type Error = PaginateError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::try_from(n).map_err(|_| invalid(raw));
        }
        // Host config often hands numbers over as "3.0"
        let value: f64 = trimmed.parse().map_err(|_| invalid(raw))?;
        Self::try_from(value).map_err(|_| invalid(raw))
    }
}

impl TryFrom<i64> for QuestionsPerPage {
    type Error = PaginateError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        usize::try_from(n)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| invalid(&n.to_string()))
    }
}

impl TryFrom<f64> for QuestionsPerPage {
    type Error = PaginateError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > usize::MAX as f64 {
            return Err(invalid(&value.to_string()));
        }
        Self::new(value as usize).ok_or_else(|| invalid(&value.to_string()))
    }
}

fn invalid(raw: &str) -> PaginateError {
    PaginateError::InvalidQuestionsPerPage(raw.to_string())
}

/// The visible slice of the question list: `[first_visible, first_visible + page_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    first_visible: usize,
    page_size: usize,
}

impl Window {
    pub fn new(page_size: QuestionsPerPage) -> Self {
        Self {
            first_visible: 0,
            page_size: page_size.get(),
        }
    }

    pub fn first_visible(&self) -> usize {
        self.first_visible
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Advance one page. Accepts the next page only when a further full step
    /// would still fit; otherwise snaps to the last full page, flush with the
    /// end (or 0 when there is not even one full page).
    pub fn step_forward(&mut self, total: usize) -> usize {
        let proposed = self.first_visible.saturating_add(self.page_size);
        self.first_visible = if proposed.saturating_add(self.page_size) < total {
            proposed
        } else if total <= self.page_size {
            0
        } else {
            total - self.page_size
        };
        self.first_visible
    }

    /// Go back one page, stopping at 0.
    pub fn step_backward(&mut self) -> usize {
        self.first_visible = self.first_visible.saturating_sub(self.page_size);
        self.first_visible
    }

    /// Put `index` first, without any clamping.
    pub fn jump_to(&mut self, index: usize) {
        self.first_visible = index;
    }

    pub fn visible_mask(&self, total: usize) -> Vec<bool> {
        visible_mask(self.first_visible, self.page_size, total)
    }
}

/// Which of `total` questions are shown for a window starting at `start`.
///
/// At most `size` entries are ever true, even if the range arithmetic says
/// otherwise.
pub fn visible_mask(start: usize, size: usize, total: usize) -> Vec<bool> {
    let end = start.saturating_add(size);
    let mut shown = 0;
    (0..total)
        .map(|i| {
            let visible = i >= start && i < end && shown < size;
            if visible {
                shown += 1;
            }
            visible
        })
        .collect()
}
