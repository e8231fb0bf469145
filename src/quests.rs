//! Daily quest board: reset on date change, progress clamped at target.
//! Rewards are paid by the caller for the quests reported as newly completed.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::QuestDef;
use crate::domain::{DailyQuest, QuestBoard, QuestKind};
use crate::util::day_key;

impl DailyQuest {
  pub fn from_def(def: &QuestDef) -> Self {
    Self {
      id: def.id.clone(),
      title: def.title.clone(),
      description: def.description.clone(),
      kind: def.kind,
      target: def.target.max(1),
      progress: 0,
      reward: def.reward,
      completed: false,
    }
  }

  /// Move progress to `value` (clamped). Returns true when this call completed the quest.
  fn set_progress(&mut self, value: u32) -> bool {
    if self.completed {
      return false;
    }
    self.progress = value.min(self.target);
    if self.progress >= self.target {
      self.completed = true;
      info!(target: "gamification", quest = %self.id, "Quest completed");
      return true;
    }
    false
  }
}

impl QuestBoard {
  /// Rebuild the board from `defs` unless it was already reset on `today`.
  /// Returns true when a reset happened.
  pub fn reset_if_stale(&mut self, defs: &[QuestDef], today: NaiveDate) -> bool {
    let key = day_key(today);
    if self.last_reset.as_deref() == Some(key.as_str()) {
      return false;
    }
    debug!(target: "gamification", previous = ?self.last_reset, today = %key, "Daily quests reset");
    self.daily_quests = defs.iter().map(DailyQuest::from_def).collect();
    self.last_reset = Some(key);
    true
  }

  /// Add `increment` to one quest. `None` if the id is unknown; otherwise whether it completed now.
  pub fn advance(&mut self, quest_id: &str, increment: u32) -> Option<Option<DailyQuest>> {
    let quest = self.daily_quests.iter_mut().find(|q| q.id == quest_id)?;
    let value = quest.progress.saturating_add(increment);
    Some(quest.set_progress(value).then(|| quest.clone()))
  }

  /// Add `increment` to every quest of `kind`; returns the ones completed by this call.
  pub fn advance_kind(&mut self, kind: QuestKind, increment: u32) -> Vec<DailyQuest> {
    self.daily_quests
      .iter_mut()
      .filter(|q| q.kind == kind)
      .filter_map(|q| {
        let value = q.progress.saturating_add(increment);
        q.set_progress(value).then(|| q.clone())
      })
      .collect()
  }

  /// Set every quest of `kind` to an absolute value (never lowering progress).
  pub fn sync_kind(&mut self, kind: QuestKind, value: u32) -> Vec<DailyQuest> {
    self.daily_quests
      .iter_mut()
      .filter(|q| q.kind == kind)
      .filter_map(|q| {
        let value = value.max(q.progress);
        q.set_progress(value).then(|| q.clone())
      })
      .collect()
  }
}
