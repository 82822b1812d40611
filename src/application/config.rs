use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

pub struct Config {
    pub api_url: String,
    pub session: Option<String>,
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub activity_log: Option<PathBuf>,
    pub log_filter: String,
    pub theme: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = var("JOURNAL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_local_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("moodjournal")
            });

        let api_url = var("JOURNAL_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session = var("JOURNAL_SESSION").filter(|s| !s.is_empty());

        let activity_log = match var("JOURNAL_ACTIVITY_LOG").as_deref() {
            Some("0") | Some("false") | Some("off") => None,
            _ => Some(data_dir.join("activity.log")),
        };

        let log_filter = var("JOURNAL_LOG").unwrap_or_else(|| "info".to_string());
        let theme = var("JOURNAL_THEME").unwrap_or_else(|| "dark".to_string());
        let log_file = data_dir.join("moodjournal.log");

        Self {
            api_url,
            session,
            data_dir,
            log_file,
            activity_log,
            log_filter,
            theme,
        }
    }

    /// Command line flags win over the environment.
    pub fn with_overrides(
        mut self,
        api_url: Option<String>,
        session: Option<String>,
        theme: Option<String>,
    ) -> Self {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
        if let Some(session) = session {
            self.session = Some(session);
        }
        if let Some(theme) = theme {
            self.theme = theme;
        }
        self
    }
}
