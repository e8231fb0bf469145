//! Per-video multiple-choice quizzes: validation, the answer-free public view, and grading.

use serde::Serialize;

use crate::domain::{Question, Quiz};

/// A question as shown to the learner (no correct index).
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
  pub question: String,
  pub options: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
  pub video_id: u64,
  pub questions: Vec<PublicQuestion>,
  pub best_score: Option<f64>,
  pub passed: bool,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizGrade {
  /// Per question, in order.
  pub results: Vec<bool>,
  pub correct: usize,
  pub total: usize,
  /// Fraction of correct answers, 0..=1.
  pub score: f64,
  pub passed: bool,
}

pub fn validate_questions(questions: &[Question]) -> Result<(), String> {
  if questions.is_empty() {
    return Err("A quiz needs at least one question".into());
  }
  for (i, q) in questions.iter().enumerate() {
    if q.question.trim().is_empty() {
      return Err(format!("Question {} has no text", i + 1));
    }
    if q.options.len() < 2 {
      return Err(format!("Question {} needs at least two options", i + 1));
    }
    if q.correct_index >= q.options.len() {
      return Err(format!("Question {} has correctIndex {} out of range", i + 1, q.correct_index));
    }
  }
  Ok(())
}

impl Quiz {
  pub fn public_view(&self) -> PublicQuiz {
    PublicQuiz {
      video_id: self.video_id,
      questions: self
        .questions
        .iter()
        .map(|q| PublicQuestion { question: q.question.clone(), options: q.options.clone() })
        .collect(),
      best_score: self.best_score,
      passed: self.passed_at.is_some(),
    }
  }

  /// Grade `answers` (option indices). Missing answers count as wrong; extras are ignored.
  pub fn grade(&self, answers: &[usize], pass_score: f64) -> QuizGrade {
    let results: Vec<bool> = self
      .questions
      .iter()
      .enumerate()
      .map(|(i, q)| answers.get(i) == Some(&q.correct_index))
      .collect();
    let correct = results.iter().filter(|r| **r).count();
    let total = results.len();
    let score = if total == 0 { 0.0 } else { correct as f64 / total as f64 };
    QuizGrade { results, correct, total, score, passed: total > 0 && score >= pass_score }
  }
}
