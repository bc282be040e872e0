//! Goal use-case service.
//!
//! The goal text and its achieved flag live under separate keys
//! (`currentGoal`, `goalAchieved`).

use crate::model::goal::Goal;
use crate::repo::json::{load_json, PersistReport, CURRENT_GOAL_KEY, GOAL_ACHIEVED_KEY};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::Saved;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalServiceError {
    EmptyGoal,
}

impl Display for GoalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyGoal => write!(f, "goal text is required"),
        }
    }
}

impl Error for GoalServiceError {}

pub struct GoalService<S: KeyValueStore> {
    store: S,
    goal: Option<Goal>,
}

impl<S: KeyValueStore> GoalService<S> {
    pub fn load(store: S) -> Self {
        let text: Option<String> = load_json(&store, CURRENT_GOAL_KEY, None);
        let achieved: bool = load_json(&store, GOAL_ACHIEVED_KEY, false);
        let goal = text
            .filter(|text| !text.trim().is_empty())
            .map(|text| Goal { text, achieved });
        Self { store, goal }
    }

    pub fn goal(&self) -> Option<&Goal> {
        self.goal.as_ref()
    }

    /// Replaces the goal; the achieved flag starts over.
    pub fn set_goal(&mut self, text: &str) -> Result<PersistReport, GoalServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GoalServiceError::EmptyGoal);
        }
        self.goal = Some(Goal::new(text));
        info!("event=goal_set module=goal status=ok");
        Ok(self.persist())
    }

    pub fn clear_goal(&mut self) -> PersistReport {
        self.goal = None;
        info!("event=goal_clear module=goal status=ok");
        self.persist()
    }

    /// Marks the goal achieved once `percent` reaches 100.
    ///
    /// `value` is `true` only on the call that flips the flag, which is the
    /// caller's cue to celebrate.
    pub fn check_achievement(&mut self, percent: u8) -> Saved<bool> {
        let Some(goal) = self.goal.as_mut() else {
            return Saved::new(false, PersistReport::new());
        };
        if goal.achieved || percent < 100 {
            return Saved::new(false, PersistReport::new());
        }
        goal.achieved = true;

        let mut persist = PersistReport::new();
        persist.save(&self.store, GOAL_ACHIEVED_KEY, &true);
        info!("event=goal_achieved module=goal status=ok");
        Saved::new(true, persist)
    }

    fn persist(&self) -> PersistReport {
        let text = self.goal.as_ref().map(|goal| goal.text.as_str());
        let achieved = self.goal.as_ref().is_some_and(|goal| goal.achieved);
        let mut persist = PersistReport::new();
        persist.save(&self.store, CURRENT_GOAL_KEY, &text);
        persist.save(&self.store, GOAL_ACHIEVED_KEY, &achieved);
        persist
    }
}
