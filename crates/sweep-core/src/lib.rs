//! Low-level filesystem and time helpers shared by the sweep crates.
//!
//! Provides the atomic write used for the scan snapshot and the Unix
//! timestamp helpers used in temp-file names and run reports.

pub mod atomic_io;
pub mod time_utils;

pub use atomic_io::write_text_atomic;
pub use time_utils::{current_unix_timestamp, current_unix_timestamp_ms};

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;

    use super::*;

    #[test]
    fn write_text_atomic_creates_and_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");

        write_text_atomic(&path, "first").expect("first write");
        assert_eq!(read_to_string(&path).expect("read"), "first");

        write_text_atomic(&path, "second").expect("second write");
        assert_eq!(read_to_string(&path).expect("read"), "second");
    }

    #[test]
    fn write_text_atomic_creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("out").join("snapshot.json");

        write_text_atomic(&path, "{}").expect("write");
        assert_eq!(read_to_string(&path).expect("read"), "{}");
    }

    #[test]
    fn write_text_atomic_rejects_directory_target() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = write_text_atomic(dir.path(), "nope").expect_err("must fail");
        assert!(error.to_string().contains("directory"));
    }

    #[test]
    fn write_text_atomic_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");
        write_text_atomic(&path, "done").expect("write");

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read_dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path() != path)
            .collect();
        assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
    }

    #[test]
    fn timestamps_agree_within_a_second() {
        let seconds = current_unix_timestamp();
        let millis = current_unix_timestamp_ms() / 1_000;
        assert!(millis >= seconds);
        assert!(millis <= seconds.saturating_add(1));
    }
}
