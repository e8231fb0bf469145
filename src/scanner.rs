//! Filesystem scanner: turns course roots into the `Catalog` written to `data.json`.
//!
//! Layout expected under every root:
//!
//! ```text
//! <root>/<course title>/<lesson>.mp4
//! <root>/<course title>/<lesson>.pdf
//! ```
//!
//! Directory and file listings are sorted by name so ids are stable between scans.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, instrument, warn};

use crate::domain::{Catalog, ContentItem, ContentKind, Course};
use crate::util::normalize_title;

/// Ids inside a course are `course_id * ID_STRIDE + n`.
const ID_STRIDE: u64 = 1000;

#[instrument(level = "info", skip_all, fields(roots = roots.len()))]
pub fn scan_course_roots(roots: &[PathBuf]) -> Catalog {
    let mut catalog = Catalog::default();
    if roots.is_empty() {
        error!(target: "catalog", "No COURSE_PATH configured");
        return catalog;
    }

    let mut next_id = 1u64;
    for root in roots {
        if !root.is_dir() {
            error!(target: "catalog", root = %root.display(), "Course path not found");
            continue;
        }
        match scan_root(root, &mut next_id) {
            Ok(courses) => catalog.courses.extend(courses),
            Err(e) => {
                error!(target: "catalog", root = %root.display(), error = %e, "Failed to scan course path")
            }
        }
    }

    info!(target: "catalog", courses = catalog.courses.len(), "Catalog generated");
    catalog
}

fn scan_root(root: &Path, next_id: &mut u64) -> std::io::Result<Vec<Course>> {
    let mut courses = Vec::new();
    let root_str = root.to_string_lossy().to_string();

    for dir_name in sorted_entries(root, true)? {
        let folder = root.join(&dir_name);
        let files = match sorted_entries(&folder, false) {
            Ok(f) => f,
            Err(e) => {
                warn!(target: "catalog", course = %dir_name, error = %e, "Skipping unreadable course folder");
                continue;
            }
        };

        let course_id = *next_id;
        *next_id += 1;

        let video_files: Vec<&String> = files.iter().filter(|f| has_ext(f, "mp4")).collect();
        let pdf_files: Vec<&String> = files.iter().filter(|f| has_ext(f, "pdf")).collect();

        let base = course_id * ID_STRIDE;
        let pdfs: Vec<ContentItem> = pdf_files
            .iter()
            .enumerate()
            .map(|(i, f)| item(base + video_files.len() as u64 + i as u64 + 1, f, &root_str, ContentKind::Pdf))
            .collect();
        let videos: Vec<ContentItem> = video_files
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let mut v = item(base + i as u64 + 1, f, &root_str, ContentKind::Video);
                v.pdf = match_pdf(&v.title, &pdfs).map(|p| Box::new(p.clone()));
                v
            })
            .collect();

        info!(target: "catalog", course = %dir_name, videos = videos.len(), pdfs = pdfs.len(), "Course scanned");

        let content = videos.iter().chain(pdfs.iter()).cloned().collect();
        courses.push(Course {
            id: course_id,
            title: dir_name,
            course_path: root_str.clone(),
            videos,
            pdfs,
            content,
        });
    }
    Ok(courses)
}

/// Names of sub-directories (`dirs = true`) or regular files, sorted.
fn sorted_entries(dir: &Path, dirs: bool) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let ft = entry.file_type()?;
        let wanted = if dirs { ft.is_dir() } else { ft.is_file() };
        if wanted {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    Ok(names)
}

fn has_ext(name: &str, ext: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

fn item(id: u64, file: &str, course_path: &str, kind: ContentKind) -> ContentItem {
    let title = Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string());
    ContentItem {
        id,
        title,
        file_path: file.to_string(),
        course_path: course_path.to_string(),
        kind,
        pdf: None,
    }
}

/// First PDF whose normalized title contains, or is contained in, the video's.
pub fn match_pdf<'a>(video_title: &str, pdfs: &'a [ContentItem]) -> Option<&'a ContentItem> {
    let v = normalize_title(video_title);
    if v.is_empty() {
        return None;
    }
    pdfs.iter().find(|p| {
        let n = normalize_title(&p.title);
        !n.is_empty() && (v.contains(&n) || n.contains(&v))
    })
}
