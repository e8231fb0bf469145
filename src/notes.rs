//! Timestamped notes attached to videos.

use chrono::{DateTime, Local};

use crate::domain::{Note, NotesBook};
use crate::util::{sanitize_seconds, timestamp};

/// Notes for one video, ordered by their position in the video.
pub fn notes_for(book: &NotesBook, video_id: u64) -> Vec<Note> {
  let mut notes = book.notes.get(&video_id).cloned().unwrap_or_default();
  notes.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp).then(a.id.cmp(&b.id)));
  notes
}

/// Append a note. Ids increase across the whole book and are never reused.
/// `None` for blank content.
pub fn add_note(
  book: &mut NotesBook,
  video_id: u64,
  at_seconds: f64,
  content: &str,
  now: DateTime<Local>,
) -> Option<Note> {
  let content = content.trim();
  if content.is_empty() {
    return None;
  }
  // Files written before the counter existed start after their highest id.
  let highest = book.notes.values().flatten().map(|n| n.id).max().unwrap_or(0);
  let id = book.next_id.max(highest + 1);
  book.next_id = id + 1;
  let note = Note {
    id,
    video_id,
    timestamp: sanitize_seconds(at_seconds),
    content: content.to_string(),
    created_at: timestamp(now),
  };
  book.notes.entry(video_id).or_default().push(note.clone());
  Some(note)
}

/// Remove a note; false if it was not there. Empty per-video lists are dropped.
pub fn delete_note(book: &mut NotesBook, video_id: u64, note_id: u64) -> bool {
  let Some(notes) = book.notes.get_mut(&video_id) else {
    return false;
  };
  let before = notes.len();
  notes.retain(|n| n.id != note_id);
  let removed = notes.len() != before;
  if notes.is_empty() {
    book.notes.remove(&video_id);
  }
  removed
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn notes_are_sorted_and_ids_are_global() {
    let mut book = NotesBook::default();
    let now = Local::now();
    let a = add_note(&mut book, 1001, 90.0, "later point", now).unwrap();
    let b = add_note(&mut book, 1001, 10.0, "  early point  ", now).unwrap();
    let c = add_note(&mut book, 2001, 5.0, "other video", now).unwrap();
    assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    assert_eq!(b.content, "early point");

    let listed = notes_for(&book, 1001);
    assert_eq!(listed.iter().map(|n| n.id).collect::<Vec<_>>(), vec![2, 1]);
    assert!(notes_for(&book, 9999).is_empty());
  }

  #[test]
  fn blank_notes_are_rejected() {
    let mut book = NotesBook::default();
    assert!(add_note(&mut book, 1, 0.0, "   ", Local::now()).is_none());
    assert!(book.notes.is_empty());
  }

  #[test]
  fn delete_reports_missing_notes() {
    let mut book = NotesBook::default();
    let n = add_note(&mut book, 1, 3.0, "x", Local::now()).unwrap();
    assert!(!delete_note(&mut book, 1, n.id + 1));
    assert!(!delete_note(&mut book, 2, n.id));
    assert!(delete_note(&mut book, 1, n.id));
    assert!(book.notes.is_empty());
  }

  #[test]
  fn deleted_ids_are_not_handed_out_again() {
    let mut book = NotesBook::default();
    let now = Local::now();
    add_note(&mut book, 1, 1.0, "a", now).unwrap();
    let b = add_note(&mut book, 1, 2.0, "b", now).unwrap();
    assert!(delete_note(&mut book, 1, b.id));
    let c = add_note(&mut book, 1, 3.0, "c", now).unwrap();
    assert_eq!(c.id, 3);
    assert_eq!(book.next_id, 4);

    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(json["nextId"], 4);
    assert!(json["notes"]["1"].is_array());
  }

  #[test]
  fn books_without_a_counter_continue_after_the_highest_id() {
    let mut book: NotesBook = serde_json::from_str(
      r#"{"notes": {"7": [{"id": 41, "videoId": 7, "timestamp": 0.0, "content": "x", "createdAt": "2026-01-01T00:00:00+00:00"}]}}"#,
    )
    .unwrap();
    assert_eq!(book.next_id, 0);
    assert_eq!(add_note(&mut book, 7, 1.0, "y", Local::now()).unwrap().id, 42);
  }
}
