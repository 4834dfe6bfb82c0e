use proptest::prelude::*;
use std::path::MAIN_SEPARATOR;
use updraft::paths::{FolderPath, ValidatedPath, ZipPath};

fn segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9_-]{1,8}", 1..5)
}

fn base() -> String {
    std::env::temp_dir().to_string_lossy().trim_end_matches(['/', '\\']).to_string()
}

fn join(segments: &[String]) -> String {
    let sep = MAIN_SEPARATOR.to_string();
    format!("{}{sep}{}{sep}", base(), segments.join(&sep))
}

proptest! {
    #[test]
    fn prop_folder_round_trip_is_identity(segments in segments()) {
        let folder = FolderPath::new(join(&segments)).unwrap();
        let again = FolderPath::new(folder.to_string()).unwrap();
        prop_assert_eq!(&again, &folder);
        prop_assert_eq!(again.to_string(), folder.to_string());
    }

    #[test]
    fn prop_folder_ignores_dot_segments(segments in segments()) {
        let plain = FolderPath::new(join(&segments)).unwrap();

        let sep = MAIN_SEPARATOR.to_string();
        let noisy = format!("{}{sep}.{sep}{}{sep}x{sep}..{sep}", base(), segments.join(&sep));
        prop_assert_eq!(FolderPath::new(noisy).unwrap(), plain);
    }

    #[test]
    fn prop_folder_always_separator_terminated(segments in segments()) {
        let folder = FolderPath::new(join(&segments)).unwrap();
        prop_assert!(folder.as_str().ends_with(MAIN_SEPARATOR));
        prop_assert!(folder.as_path().is_absolute());
    }

    #[test]
    fn prop_zip_path_in_folder_gets_default_name(segments in segments()) {
        let folder = join(&segments);
        let zip = ZipPath::new(&folder).unwrap();
        prop_assert_eq!(zip.file_name(), Some("update.zip"));
        prop_assert_eq!(zip.parent_folder().unwrap(), FolderPath::new(&folder).unwrap());
    }
}
