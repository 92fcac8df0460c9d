use std::cell::RefCell;

use super::*;

#[derive(Default)]
struct Recorder {
    calls: RefCell<Vec<(PathBuf, String)>>,
    reject: Option<&'static str>,
}

impl Uploader for Recorder {
    fn upload(&self, local: &Path, remote_path: &str) -> Result<(), UploadError> {
        self.calls
            .borrow_mut()
            .push((local.to_path_buf(), remote_path.to_string()));
        if self.reject.is_some_and(|r| remote_path.ends_with(r)) {
            return Err(UploadError::Status {
                remote: remote_path.to_string(),
                status: 500,
                body: "backend error".to_string(),
            });
        }
        Ok(())
    }
}

fn batch_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in ["question_0.jpg", "question_1.jpg", "caption.txt", "daily_video.mp4"] {
        std::fs::write(dir.path().join(name), name).unwrap();
    }
    std::fs::create_dir(dir.path().join("extras")).unwrap();
    std::fs::write(dir.path().join("extras").join("notes.txt"), "n").unwrap();
    dir
}

#[test]
fn remote_paths_use_forward_slashes() {
    assert_eq!(
        remote_path_for("queue/001", Path::new("question_0.jpg")),
        "queue/001/question_0.jpg"
    );
    assert_eq!(
        remote_path_for("queue/001/", &Path::new("extras").join("notes.txt")),
        "queue/001/extras/notes.txt"
    );
    assert_eq!(remote_path_for("", Path::new("a.txt")), "a.txt");
}

#[test]
fn content_types_follow_extensions() {
    assert_eq!(content_type_for(Path::new("a.JPG")), "image/jpeg");
    assert_eq!(content_type_for(Path::new("daily_video.mp4")), "video/mp4");
    assert!(content_type_for(Path::new("caption.txt")).starts_with("text/plain"));
    assert_eq!(
        content_type_for(Path::new("blob")),
        "application/octet-stream"
    );
}

#[test]
fn uploads_every_file_recursively() {
    let dir = batch_dir();
    let rec = Recorder::default();
    let report = upload_dir(&rec, dir.path(), "queue/007");

    assert!(report.is_complete());
    let mut remotes = report.uploaded.clone();
    remotes.sort();
    assert_eq!(
        remotes,
        vec![
            "queue/007/caption.txt",
            "queue/007/daily_video.mp4",
            "queue/007/extras/notes.txt",
            "queue/007/question_0.jpg",
            "queue/007/question_1.jpg",
        ]
    );
    assert_eq!(rec.calls.borrow().len(), 5);
}

#[test]
fn failures_are_collected_and_the_rest_still_upload() {
    let dir = batch_dir();
    let rec = Recorder {
        reject: Some("daily_video.mp4"),
        ..Recorder::default()
    };
    let report = upload_dir(&rec, dir.path(), "queue/002");

    assert!(!report.is_complete());
    assert_eq!(report.uploaded.len(), 4);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "queue/002/daily_video.mp4");
    assert!(matches!(
        report.failed[0].1,
        UploadError::Status { status: 500, .. }
    ));
}

#[test]
fn missing_directory_reports_a_walk_failure() {
    let dir = tempfile::tempdir().unwrap();
    let rec = Recorder::default();
    let report = upload_dir(&rec, &dir.path().join("nope"), "queue/003");
    assert!(report.uploaded.is_empty());
    assert!(matches!(report.failed[0].1, UploadError::Walk { .. }));
}
