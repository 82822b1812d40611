/// Test utilities for exercising the journal client without a real backend.
///
/// `FakeJournalApi` keeps entries in memory and answers the way the journal
/// service does (newest-first listing, 100 character previews, blank `is_new`
/// entries for empty dates, trimmed and required content on save). Each
/// operation can be switched to fail, and every call is recorded.
///
/// `StubServer` is an axum router on an ephemeral port that hands out canned
/// responses in order and captures each request it receives.
///
/// ## Usage Examples
///
/// ```rust
/// use crate::infrastructure::test_utils::test_harness::FakeJournalApi;
///
/// #[test]
/// fn my_test() {
///     let api = FakeJournalApi::new();
///     api.insert("2024-02-29", "test", Some("happy"));
///     api.fail_list(true);
///     // ...
///     assert_eq!(api.calls(), vec!["list"]);
/// }
/// ```
#[cfg(test)]
pub mod test_harness {
    use crate::domain::{DateKey, EntryDraft, EntrySummary, JournalEntry, JournalError, MutationReply};
    use crate::infrastructure::JournalApi;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header};
    use axum::response::{IntoResponse, Response};
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;
    use tokio::runtime::Runtime;

    const PREVIEW_CHARS: usize = 100;

    #[derive(Default)]
    struct Failures {
        list: AtomicBool,
        get: AtomicBool,
        save: AtomicBool,
        delete: AtomicBool,
    }

    #[derive(Default)]
    pub struct FakeJournalApi {
        entries: Mutex<BTreeMap<DateKey, (String, Option<String>)>>,
        failures: Failures,
        calls: Mutex<Vec<String>>,
    }

    impl FakeJournalApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&self, date: &str, content: &str, mood: Option<&str>) {
            let key: DateKey = date.parse().expect("valid test date");
            self.entries
                .lock()
                .unwrap()
                .insert(key, (content.to_string(), mood.map(str::to_string)));
        }

        pub fn stored(&self, date: &str) -> Option<(String, Option<String>)> {
            let key: DateKey = date.parse().expect("valid test date");
            self.entries.lock().unwrap().get(&key).cloned()
        }

        pub fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }

        pub fn fail_list(&self, fail: bool) {
            self.failures.list.store(fail, Ordering::SeqCst);
        }

        pub fn fail_get(&self, fail: bool) {
            self.failures.get.store(fail, Ordering::SeqCst);
        }

        pub fn fail_save(&self, fail: bool) {
            self.failures.save.store(fail, Ordering::SeqCst);
        }

        pub fn fail_delete(&self, fail: bool) {
            self.failures.delete.store(fail, Ordering::SeqCst);
        }

        /// Calls so far, e.g. `["list", "get 2024-02-29"]`.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn clear_calls(&self) {
            self.calls.lock().unwrap().clear();
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn check(flag: &AtomicBool) -> Result<(), JournalError> {
            if flag.load(Ordering::SeqCst) {
                Err(JournalError::Network("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn preview(content: &str) -> String {
        let mut preview: String = content.chars().take(PREVIEW_CHARS).collect();
        if content.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        preview
    }

    impl JournalApi for FakeJournalApi {
        fn list_entries(&self) -> Result<Vec<EntrySummary>, JournalError> {
            self.record("list".to_string());
            Self::check(&self.failures.list)?;

            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .rev()
                .map(|(date, (content, mood))| EntrySummary {
                    date: *date,
                    mood: mood.clone(),
                    preview: preview(content),
                })
                .collect())
        }

        fn get_entry(&self, date: DateKey) -> Result<JournalEntry, JournalError> {
            self.record(format!("get {date}"));
            Self::check(&self.failures.get)?;

            Ok(match self.entries.lock().unwrap().get(&date) {
                Some((content, mood)) => JournalEntry {
                    date,
                    content: content.clone(),
                    mood: mood.clone(),
                    is_new: false,
                },
                None => JournalEntry::blank(date),
            })
        }

        fn save_entry(&self, date: DateKey, draft: &EntryDraft) -> Result<MutationReply, JournalError> {
            self.record(format!("save {date}"));
            Self::check(&self.failures.save)?;

            let content = draft.content.trim();
            if content.is_empty() {
                return Err(JournalError::server(Some(400), "Content is required"));
            }

            let mood = draft.mood.as_ref().map(|m| m.as_str().to_string());
            let previous = self
                .entries
                .lock()
                .unwrap()
                .insert(date, (content.to_string(), mood));
            let message = if previous.is_some() {
                "Journal entry updated successfully"
            } else {
                "Journal entry created successfully"
            };

            Ok(MutationReply {
                success: true,
                message: Some(message.to_string()),
                error: None,
            })
        }

        fn delete_entry(&self, date: DateKey) -> Result<MutationReply, JournalError> {
            self.record(format!("delete {date}"));
            Self::check(&self.failures.delete)?;

            match self.entries.lock().unwrap().remove(&date) {
                Some(_) => Ok(MutationReply {
                    success: true,
                    message: Some("Journal entry deleted successfully".to_string()),
                    error: None,
                }),
                None => Err(JournalError::server(Some(404), "Entry not found")),
            }
        }
    }

    /// A request as the stub server saw it.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CapturedRequest {
        pub method: String,
        pub path: String,
        pub cookie: Option<String>,
        pub body: String,
    }

    #[derive(Default)]
    struct StubState {
        responses: Mutex<VecDeque<(u16, String)>>,
        requests: Mutex<Vec<CapturedRequest>>,
    }

    /// Serves `responses` in order from a background runtime. Stops when
    /// dropped.
    pub struct StubServer {
        base_url: String,
        state: Arc<StubState>,
        runtime: Runtime,
    }

    impl StubServer {
        pub fn start(responses: Vec<(u16, String)>) -> Self {
            let state = Arc::new(StubState {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            });
            let app = Router::new()
                .fallback(answer)
                .with_state(Arc::clone(&state));

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("stub server runtime");
            let listener = runtime
                .block_on(TcpListener::bind("127.0.0.1:0"))
                .expect("bind stub server");
            let port = listener.local_addr().expect("stub server address").port();
            runtime.spawn(async move {
                axum::serve(listener, app).await.expect("stub server");
            });

            Self {
                base_url: format!("http://127.0.0.1:{port}"),
                state,
                runtime,
            }
        }

        pub fn base_url(&self) -> String {
            self.base_url.clone()
        }

        /// Shuts the server down and returns the captured requests. Every
        /// canned response must have been served.
        pub fn finish(self) -> Vec<CapturedRequest> {
            let Self { state, runtime, .. } = self;
            runtime.shutdown_background();

            let unserved = state.responses.lock().unwrap().len();
            assert_eq!(unserved, 0, "stub server has {unserved} unserved responses");
            state.requests.lock().unwrap().clone()
        }
    }

    async fn answer(
        State(state): State<Arc<StubState>>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: String,
    ) -> Response {
        state.requests.lock().unwrap().push(CapturedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            cookie: headers
                .get(header::COOKIE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            body,
        });

        let Some((status, body)) = state.responses.lock().unwrap().pop_front() else {
            return (StatusCode::INTERNAL_SERVER_ERROR, "no canned response left").into_response();
        };
        let status = StatusCode::from_u16(status).expect("valid status code");
        let mut response = (status, [(header::CONTENT_TYPE, "application/json")], body).into_response();
        if status.is_redirection() {
            response
                .headers_mut()
                .insert(header::LOCATION, HeaderValue::from_static("/login"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::test_harness::*;
    use crate::domain::{EntryDraft, JournalError};
    use crate::infrastructure::JournalApi;

    #[test]
    fn test_fake_follows_backend_semantics() {
        let api = FakeJournalApi::new();
        api.insert("2024-01-01", &"a".repeat(120), None);
        api.insert("2024-02-29", "test", Some("happy"));

        let entries = api.list_entries().unwrap();
        assert_eq!(entries[0].date.to_string(), "2024-02-29");
        assert_eq!(entries[1].preview.chars().count(), 103);
        assert!(entries[1].preview.ends_with("..."));

        let blank = api.get_entry("2024-03-01".parse().unwrap()).unwrap();
        assert!(blank.is_new);

        let empty = EntryDraft {
            content: "   ".to_string(),
            mood: None,
        };
        assert!(api.save_entry("2024-03-01".parse().unwrap(), &empty).is_err());
        assert!(matches!(
            api.delete_entry("2024-03-01".parse().unwrap()),
            Err(JournalError::Server { status: Some(404), .. })
        ));
    }

    #[test]
    fn test_fake_failure_injection_and_call_log() {
        let api = FakeJournalApi::new();
        api.fail_list(true);

        assert!(matches!(api.list_entries(), Err(JournalError::Network(_))));
        api.fail_list(false);
        assert!(api.list_entries().unwrap().is_empty());
        assert_eq!(api.calls(), vec!["list", "list"]);
    }
}
