//! Goal-count progress derived from the completion ledger.
//!
//! The count is the number of completion records; there is no separate
//! counter to drift from the ledger.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub completed: u32,
    pub goal: Option<u32>,
    pub reached: bool,
}

impl GoalProgress {
    pub fn new(completed: u32, goal: Option<u32>) -> Self {
        Self {
            completed,
            goal,
            reached: goal.is_some_and(|goal| completed >= goal),
        }
    }

    /// Completion percentage capped at 100, or `None` without a goal.
    pub fn percent(&self) -> Option<u8> {
        let goal = self.goal.filter(|goal| *goal > 0)?;
        let capped = u64::from(self.completed.min(goal));
        Some((capped * 100 / u64::from(goal)) as u8)
    }
}
