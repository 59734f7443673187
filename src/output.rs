use crate::error::MetaScanError;
use crate::facebook::{PageInfo, PostsFeed, Profile};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct ScanOutput<'a> {
    pub username: &'a str,
    pub profile: Option<&'a Profile>,
    pub page: Option<&'a PageInfo>,
    pub posts: Option<&'a PostsFeed>,
}

/// File stem for a username: path separators become `_`, empty becomes `output`.
pub fn output_file_stem(username: &str) -> String {
    let stem = username.replace(['/', '\\'], "_");
    if stem.is_empty() {
        "output".to_string()
    } else {
        stem
    }
}

pub fn save_json(
    out_dir: &Path,
    username: &str,
    profile: Option<&Profile>,
    page: Option<&PageInfo>,
    posts: Option<&PostsFeed>,
) -> Result<PathBuf, MetaScanError> {
    fs::create_dir_all(out_dir).map_err(|source| MetaScanError::Persistence {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let out_path = out_dir.join(format!("{}.json", output_file_stem(username)));
    let payload = ScanOutput {
        username,
        profile,
        page,
        posts,
    };
    let json = serde_json::to_string_pretty(&payload)?;

    fs::write(&out_path, json).map_err(|source| MetaScanError::Persistence {
        path: out_path.clone(),
        source,
    })?;

    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facebook::{parse_posts_response, parse_profile_response};
    use serde_json::{Value, json};
    use tempfile::TempDir;

    #[test]
    fn test_output_file_stem() {
        assert_eq!(output_file_stem("nasa"), "nasa");
        assert_eq!(output_file_stem("people/nasa/123"), "people_nasa_123");
        assert_eq!(output_file_stem(r"a\b"), "a_b");
        assert_eq!(output_file_stem(""), "output");
    }

    #[test]
    fn test_save_json_writes_all_roles() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("nested").join("out");

        let profile = parse_profile_response(json!({"data": {"name": "NASA"}})).unwrap();
        let posts = parse_posts_response(json!([])).unwrap();

        let path = save_json(&out_dir, "nasa", Some(&profile), None, Some(&posts)).unwrap();
        assert_eq!(path, out_dir.join("nasa.json"));

        let content = fs::read_to_string(&path).unwrap();
        let saved: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(saved["username"], "nasa");
        assert_eq!(saved["profile"], json!({"name": "NASA"}));
        assert_eq!(saved["page"], Value::Null);
        assert_eq!(saved["posts"], json!({"data": {"posts": []}}));
    }

    #[test]
    fn test_save_json_keeps_unicode() {
        let temp_dir = TempDir::new().unwrap();
        let profile = parse_profile_response(json!({"name": "Café ☕"})).unwrap();

        let path = save_json(temp_dir.path(), "cafe", Some(&profile), None, None).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("Café ☕"));
    }

    #[test]
    fn test_save_json_reports_unwritable_directory() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let result = save_json(&blocker.join("out"), "nasa", None, None, None);
        assert!(matches!(result, Err(MetaScanError::Persistence { .. })));
    }
}
