use crate::application::{ApiRequest, ApiResponse, EntryEditor, EntryStore, Navigation, StatusLine};
use crate::domain::{DateKey, JournalError, MonthGrid, Mood};
use crate::infrastructure::JournalApi;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::time::Instant;

/// The journal calendar component: month navigation, entry cache, editor
/// and status line owned together.
///
/// Operations return the backend calls they need; the caller runs them and
/// feeds each response back through [`JournalController::apply`].
#[derive(Debug)]
pub struct JournalController {
    navigation: Navigation,
    store: EntryStore,
    editor: EntryEditor,
    status: StatusLine,
    today: NaiveDate,
}

impl JournalController {
    /// Shows the current month with today selected; returns the initial
    /// entry list and today's entry loads.
    pub fn mount(today: NaiveDate) -> (Self, Vec<ApiRequest>) {
        Self::mount_at(today, today)
    }

    /// Like [`mount`](Self::mount) with another date initially selected.
    pub fn mount_at(today: NaiveDate, selected: NaiveDate) -> (Self, Vec<ApiRequest>) {
        let mut controller = Self {
            navigation: Navigation::new(selected),
            store: EntryStore::new(),
            editor: EntryEditor::new(),
            status: StatusLine::new(),
            today,
        };

        let mut requests = vec![controller.refresh()];
        requests.extend(controller.select_date(selected));
        (controller, requests)
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn editor(&self) -> &EntryEditor {
        &self.editor
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Keeps the "today" marker right when the view outlives midnight.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn prev_month(&mut self) {
        self.navigation.prev_month();
    }

    pub fn next_month(&mut self) {
        self.navigation.next_month();
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Option<ApiRequest> {
        self.navigation.show(date);
        self.editor.select_date(DateKey::new(date))
    }

    /// Moves the selection by `days`, for keyboard navigation.
    pub fn step_selection(&mut self, days: i64) -> Option<ApiRequest> {
        let from = self
            .editor
            .selected()
            .map(|key| key.date())
            .unwrap_or(self.today);
        self.select_date(Navigation::step(from, days))
    }

    pub fn refresh(&mut self) -> ApiRequest {
        ApiRequest::LoadAll {
            seq: self.store.begin_load(),
        }
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        self.editor.insert_char(c)
    }

    pub fn backspace(&mut self) -> bool {
        self.editor.backspace()
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        self.editor.set_content(content)
    }

    pub fn select_mood(&mut self, mood: Option<Mood>) -> bool {
        self.editor.select_mood(mood)
    }

    pub fn save(&mut self, now: Instant) -> Option<ApiRequest> {
        let result = self.editor.save();
        self.reject_on_error(result, now)
    }

    pub fn request_delete(&mut self, now: Instant) -> bool {
        let result = self.editor.request_delete();
        self.reject_on_error(result, now).is_some()
    }

    pub fn confirm_delete(&mut self, now: Instant) -> Option<ApiRequest> {
        let result = self.editor.confirm_delete();
        self.reject_on_error(result, now)
    }

    pub fn cancel_delete(&mut self) {
        self.editor.cancel_delete();
    }

    /// Applies one backend response and returns the follow-up calls.
    pub fn apply(&mut self, response: ApiResponse, now: Instant) -> Vec<ApiRequest> {
        match response {
            ApiResponse::EntriesLoaded { seq, result } => {
                self.store.apply_load(seq, result);
                Vec::new()
            }
            ApiResponse::EntryLoaded { date, result } => {
                if let Some(Err(e)) = self.editor.entry_loaded(date, result) {
                    warn!("Could not load entry for {date}: {e}");
                    self.status.error(e.to_string(), now);
                }
                Vec::new()
            }
            ApiResponse::Saved { date, result } => {
                let succeeded = result.is_ok();
                match self.editor.saved(date, result) {
                    Some(Ok(reply)) => {
                        info!("Saved entry for {date}");
                        let message = reply.message.unwrap_or_else(|| "Entry saved".to_string());
                        self.status.success(message, now);
                    }
                    Some(Err(e)) => {
                        warn!("Could not save entry for {date}: {e}");
                        self.status.error(e.to_string(), now);
                    }
                    None => debug!("Save for {date} finished after the selection moved"),
                }
                self.settle(date, succeeded)
            }
            ApiResponse::Deleted { date, result } => {
                let succeeded = result.is_ok();
                match self.editor.deleted(date, result) {
                    Some(Ok(reply)) => {
                        info!("Deleted entry for {date}");
                        let message = reply.message.unwrap_or_else(|| "Entry deleted".to_string());
                        self.status.success(message, now);
                    }
                    Some(Err(e)) => {
                        warn!("Could not delete entry for {date}: {e}");
                        self.status.error(e.to_string(), now);
                    }
                    None => debug!("Delete for {date} finished after the selection moved"),
                }
                self.settle(date, succeeded)
            }
        }
    }

    /// Grid for the displayed month, annotated from the entry store.
    pub fn calendar(&self) -> MonthGrid {
        MonthGrid::build(
            self.navigation.cursor(),
            self.editor.selected(),
            self.today,
            &self.store,
        )
        .with_notice(self.store.error().map(str::to_string))
    }

    /// Follow-ups once a save or delete for `date` has been answered.
    fn settle(&mut self, date: DateKey, succeeded: bool) -> Vec<ApiRequest> {
        let mut requests = Vec::new();
        if succeeded {
            requests.push(self.refresh());
        }
        requests.extend(self.editor.resume_load(date));
        requests
    }

    fn reject_on_error<T>(&mut self, result: Result<T, JournalError>, now: Instant) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Rejected locally: {e}");
                self.status.error(e.to_string(), now);
                None
            }
        }
    }
}

/// Runs `requests` and every follow-up they cause, one at a time, until the
/// controller has nothing left to ask for.
pub fn drive(
    controller: &mut JournalController,
    api: &dyn JournalApi,
    requests: impl IntoIterator<Item = ApiRequest>,
) {
    let mut queue: VecDeque<ApiRequest> = requests.into_iter().collect();
    while let Some(request) = queue.pop_front() {
        let response = request.execute(api);
        queue.extend(controller.apply(response, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{EditorState, StatusKind};
    use crate::infrastructure::test_utils::test_harness::FakeJournalApi;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn mounted(api: &FakeJournalApi, today: NaiveDate) -> JournalController {
        let (mut controller, requests) = JournalController::mount(today);
        drive(&mut controller, api, requests);
        controller
    }

    #[test]
    fn test_mount_loads_list_and_today() {
        let api = FakeJournalApi::new();
        api.insert("2024-02-10", "earlier", Some("sad"));
        let controller = mounted(&api, date(2024, 2, 29));

        assert_eq!(api.calls(), vec!["list", "get 2024-02-29"]);
        assert_eq!(controller.editor().selected(), Some(key("2024-02-29")));
        assert_eq!(controller.editor().state(), EditorState::Ready);
        assert_eq!(controller.navigation().cursor().month(), 2);

        let grid = controller.calendar();
        assert!(grid.day(&key("2024-02-29")).unwrap().today);
        assert!(grid.day(&key("2024-02-29")).unwrap().selected);
        assert_eq!(grid.entry_count(), 1);
    }

    #[test]
    fn test_has_entry_markers_match_loaded_entries() {
        let api = FakeJournalApi::new();
        for day in ["2024-02-01", "2024-02-14", "2024-02-15", "2024-02-28"] {
            api.insert(day, "x", None);
        }
        let controller = mounted(&api, date(2024, 2, 3));

        let grid = controller.calendar();
        let marked: Vec<String> = grid
            .days
            .iter()
            .filter(|c| c.has_entry)
            .map(|c| c.key.to_string())
            .collect();
        assert_eq!(marked, vec!["2024-02-01", "2024-02-14", "2024-02-15", "2024-02-28"]);
        assert_eq!(controller.store().len(), 4);
    }

    #[test]
    fn test_leap_day_save_then_delete() {
        let api = FakeJournalApi::new();
        let mut controller = mounted(&api, date(2024, 2, 1));
        let leap = key("2024-02-29");

        let request = controller.select_date(leap.date());
        drive(&mut controller, &api, request);
        assert!(controller.editor().is_new());
        assert!(!controller.editor().controls().can_delete);

        controller.set_content("test");
        controller.select_mood(Some(Mood::Happy));
        let request = controller.save(Instant::now());
        drive(&mut controller, &api, request);

        let cell = controller.calendar().day(&leap).cloned().unwrap();
        assert!(cell.has_entry);
        assert_eq!(cell.glyph, Some("😊"));
        assert!(controller.editor().controls().can_delete);
        assert_eq!(
            controller.status().visible(Instant::now()).unwrap().text,
            "Journal entry created successfully"
        );

        assert!(controller.request_delete(Instant::now()));
        let request = controller.confirm_delete(Instant::now());
        drive(&mut controller, &api, request);

        assert!(controller.store().find(&leap).is_none());
        let cell = controller.calendar().day(&leap).cloned().unwrap();
        assert!(!cell.has_entry);
        assert_eq!(cell.glyph, None);
        assert!(!controller.editor().controls().can_delete);
        assert_eq!(api.len(), 0);
    }

    #[test]
    fn test_empty_save_issues_no_call() {
        let api = FakeJournalApi::new();
        api.insert("2024-02-29", "keep", None);
        let mut controller = mounted(&api, date(2024, 2, 29));
        api.clear_calls();

        controller.set_content("  ");
        let request = controller.save(Instant::now());
        assert!(request.is_none());
        drive(&mut controller, &api, request);

        assert!(api.calls().is_empty());
        assert_eq!(controller.editor().state(), EditorState::Ready);
        assert_eq!(api.stored("2024-02-29").unwrap().0, "keep");
        assert_eq!(
            controller.status().visible(Instant::now()).unwrap().text,
            "Please write something before saving"
        );
    }

    #[test]
    fn test_list_failure_still_renders() {
        let api = FakeJournalApi::new();
        api.insert("2024-02-14", "x", Some("happy"));
        api.fail_list(true);
        let controller = mounted(&api, date(2024, 2, 29));

        let grid = controller.calendar();
        assert_eq!(grid.entry_count(), 0);
        assert_eq!(grid.days.len(), 29);
        assert_eq!(grid.notice.as_deref(), Some("Could not load entries"));
        assert_eq!(controller.editor().state(), EditorState::Ready);
    }

    #[test]
    fn test_month_navigation_leaves_state_alone() {
        let api = FakeJournalApi::new();
        let mut controller = mounted(&api, date(2024, 12, 31));
        api.clear_calls();
        let selected = controller.editor().selected();

        controller.next_month();
        let cursor = controller.navigation().cursor();
        assert_eq!((cursor.year(), cursor.month()), (2025, 1));
        assert_eq!(controller.editor().selected(), selected);
        assert_eq!(controller.editor().state(), EditorState::Ready);
        assert!(api.calls().is_empty());
        assert!(controller.calendar().days.iter().all(|c| !c.selected));
    }

    #[test]
    fn test_stale_load_after_fast_selection() {
        let api = FakeJournalApi::new();
        api.insert("2024-02-28", "old", None);
        api.insert("2024-02-29", "new", None);
        let mut controller = mounted(&api, date(2024, 2, 1));

        let first = controller.select_date(date(2024, 2, 28)).unwrap();
        let second = controller.select_date(date(2024, 2, 29)).unwrap();

        // Resolve out of order: the newer request answers first.
        let now = Instant::now();
        controller.apply(second.execute(&api), now);
        controller.apply(first.execute(&api), now);

        assert_eq!(controller.editor().selected(), Some(key("2024-02-29")));
        assert_eq!(controller.editor().content(), "new");
    }

    #[test]
    fn test_save_for_abandoned_date_still_refreshes_store() {
        let api = FakeJournalApi::new();
        let mut controller = mounted(&api, date(2024, 2, 28));

        controller.set_content("written");
        let save = controller.save(Instant::now()).unwrap();
        let load = controller.select_date(date(2024, 2, 29)).unwrap();

        let follow_ups = controller.apply(save.execute(&api), Instant::now());
        assert_eq!(follow_ups.len(), 1);
        drive(&mut controller, &api, follow_ups);
        drive(&mut controller, &api, [load]);

        assert!(controller.store().has_entry(&key("2024-02-28")));
        assert_eq!(controller.editor().selected(), Some(key("2024-02-29")));
        assert_eq!(controller.editor().content(), "");
    }

    #[test]
    fn test_failed_entry_load_reports_and_idles() {
        let api = FakeJournalApi::new();
        api.fail_get(true);
        let controller = mounted(&api, date(2024, 2, 29));

        assert_eq!(controller.editor().state(), EditorState::Idle);
        let status = controller.status().visible(Instant::now()).unwrap();
        assert!(status.text.starts_with("Network error"));
    }

    #[test]
    fn test_failed_delete_keeps_entry_displayed() {
        let api = FakeJournalApi::new();
        api.insert("2024-02-29", "keep", Some("worried"));
        let mut controller = mounted(&api, date(2024, 2, 29));
        api.fail_delete(true);
        api.clear_calls();

        controller.request_delete(Instant::now());
        let request = controller.confirm_delete(Instant::now());
        drive(&mut controller, &api, request);

        assert_eq!(api.calls(), vec!["delete 2024-02-29"]);
        assert_eq!(controller.editor().content(), "keep");
        assert!(controller.editor().controls().can_delete);
        assert!(controller.store().has_entry(&key("2024-02-29")));
    }

    #[test]
    fn test_returning_mid_save_reloads_after_reply() {
        let api = FakeJournalApi::new();
        let mut controller = mounted(&api, date(2024, 2, 28));
        let now = Instant::now();

        controller.set_content("test");
        let save = controller.save(now).unwrap();
        let request = controller.select_date(date(2024, 2, 29));
        drive(&mut controller, &api, request);
        api.clear_calls();

        // Back on the 28th before the save has been answered.
        assert!(controller.select_date(date(2024, 2, 28)).is_none());
        assert_eq!(controller.editor().selected(), Some(key("2024-02-28")));
        assert_eq!(controller.editor().state(), EditorState::Loading);

        let follow_ups = controller.apply(save.execute(&api), now);
        assert!(follow_ups.contains(&ApiRequest::LoadEntry(key("2024-02-28"))));
        drive(&mut controller, &api, follow_ups);

        assert_eq!(api.calls(), vec!["save 2024-02-28", "list", "get 2024-02-28"]);
        assert_eq!(controller.editor().state(), EditorState::Ready);
        assert_eq!(controller.editor().content(), "test");
        assert!(!controller.editor().is_new());
        assert!(controller.editor().controls().can_delete);
        assert!(controller.store().has_entry(&key("2024-02-28")));
    }

    #[test]
    fn test_failed_save_reports_and_keeps_draft() {
        let api = FakeJournalApi::new();
        let mut controller = mounted(&api, date(2024, 2, 29));
        api.fail_save(true);
        api.clear_calls();

        controller.set_content("draft");
        controller.select_mood(Some(Mood::Anxious));
        let request = controller.save(Instant::now());
        drive(&mut controller, &api, request);

        assert_eq!(api.calls(), vec!["save 2024-02-29"]);
        let status = controller.status().visible(Instant::now()).unwrap();
        assert_eq!(status.text, "Network error: connection refused");
        assert_eq!(status.kind, StatusKind::Error);

        assert_eq!(controller.editor().state(), EditorState::Ready);
        assert_eq!(controller.editor().content(), "draft");
        assert_eq!(controller.editor().mood(), Some(Mood::Anxious));
        assert!(controller.editor().is_new());
        assert!(!controller.store().has_entry(&key("2024-02-29")));
        assert_eq!(api.len(), 0);
    }

    #[test]
    fn test_content_edit_keeps_unrecognised_mood() {
        let api = FakeJournalApi::new();
        api.insert("2024-02-29", "before", Some("surprised"));
        let mut controller = mounted(&api, date(2024, 2, 29));
        assert_eq!(controller.editor().mood(), None);

        controller.set_content("after");
        let request = controller.save(Instant::now());
        drive(&mut controller, &api, request);

        assert_eq!(
            api.stored("2024-02-29"),
            Some(("after".to_string(), Some("surprised".to_string())))
        );
        assert_eq!(
            controller.store().find(&key("2024-02-29")).unwrap().mood.as_deref(),
            Some("surprised")
        );
    }
}
