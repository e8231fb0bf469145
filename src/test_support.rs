//! Fixtures shared by the unit tests: a scratch data dir and a one-course tree.
//!
//! The course "Rust" (id 1) holds videos 1001 "01 Intro" and 1002 "02 Traits",
//! plus PDF 1003 "01 Intro".

use chrono::{DateTime, Local, TimeZone};

use crate::config::Settings;
use crate::state::AppState;

pub fn state_with_course() -> (tempfile::TempDir, AppState) {
    let tmp = tempfile::tempdir().unwrap();
    let course = tmp.path().join("courses").join("Rust");
    std::fs::create_dir_all(&course).unwrap();
    std::fs::write(course.join("01 Intro.mp4"), b"0123456789").unwrap();
    std::fs::write(course.join("02 Traits.mp4"), b"abcdefghij").unwrap();
    std::fs::write(course.join("01 Intro.pdf"), b"%PDF-1.4").unwrap();
    let settings = Settings {
        course_paths: vec![tmp.path().join("courses")],
        data_dir: tmp.path().join("data"),
        static_dir: tmp.path().join("static"),
        ..Settings::default()
    };
    (tmp, AppState::new(settings))
}

/// Same fixture with `data.json` already written.
pub async fn scanned_state() -> (tempfile::TempDir, AppState) {
    let (tmp, state) = state_with_course();
    state.refresh_catalog().await.unwrap();
    (tmp, state)
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}
