use std::path::{Path, PathBuf};

/// Best-effort `.env` loader run before reading `REPO_FINDER_*` settings.
///
/// - Does not override existing environment variables.
/// - Ignores blank lines and comments starting with `#`.
/// - Accepts `KEY=VALUE` with optional single/double quotes for VALUE.
pub fn load_dotenv_if_present() {
    for path in dotenv_candidate_paths() {
        if path.exists() {
            match load_dotenv_file(&path) {
                Ok(n) => log::info!("[env_loader] loaded {} value(s) from {:?}", n, path),
                Err(err) => log::warn!("[env_loader] cannot read {:?}: {}", path, err),
            }
            break;
        }
    }
}

fn dotenv_candidate_paths() -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };
    dotenv_candidate_paths_for_home(&home)
}

fn dotenv_candidate_paths_for_home(home: &Path) -> Vec<PathBuf> {
    vec![home.join(".repo-finder").join(".env")]
}

/// Returns how many variables were set.
fn load_dotenv_file(path: &Path) -> std::io::Result<usize> {
    let content = std::fs::read_to_string(path)?;
    let mut applied = 0;
    for (key, value) in parse_dotenv(&content) {
        if std::env::var_os(&key).is_some() {
            continue;
        }
        std::env::set_var(key, value);
        applied += 1;
    }
    Ok(applied)
}

fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let mut value = value.trim().to_string();
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = value[1..value.len() - 1].to_string();
        }
        out.push((key.to_string(), value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn dotenv_path_is_under_repo_finder() {
        let home = PathBuf::from("/tmp/home");
        let paths = dotenv_candidate_paths_for_home(&home);
        assert_eq!(paths, vec![home.join(".repo-finder").join(".env")]);
    }

    #[test]
    fn parse_skips_comments_and_strips_quotes() {
        let pairs = parse_dotenv(
            r#"
# comment
REPO_FINDER_PAGING=client
REPO_FINDER_USER_AGENT="quoted agent"
REPO_FINDER_API_BASE='http://localhost:1'
=orphan
no_equals_sign
EMPTY="
"#,
        );
        assert_eq!(
            pairs,
            vec![
                ("REPO_FINDER_PAGING".to_string(), "client".to_string()),
                ("REPO_FINDER_USER_AGENT".to_string(), "quoted agent".to_string()),
                (
                    "REPO_FINDER_API_BASE".to_string(),
                    "http://localhost:1".to_string()
                ),
                ("EMPTY".to_string(), "\"".to_string()),
            ]
        );
    }

    #[test]
    fn load_does_not_override_existing() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join(".env");
        fs::write(
            &p,
            "REPO_FINDER_TEST_FRESH=abc\nREPO_FINDER_TEST_KEPT=from-file\n",
        )
        .unwrap();

        std::env::remove_var("REPO_FINDER_TEST_FRESH");
        std::env::set_var("REPO_FINDER_TEST_KEPT", "from-env");

        let applied = load_dotenv_file(&p).unwrap();

        assert_eq!(applied, 1);
        assert_eq!(std::env::var("REPO_FINDER_TEST_FRESH").unwrap(), "abc");
        assert_eq!(std::env::var("REPO_FINDER_TEST_KEPT").unwrap(), "from-env");
    }
}
