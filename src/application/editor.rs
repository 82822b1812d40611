use crate::application::ApiRequest;
use crate::domain::{DateKey, EntryDraft, JournalEntry, JournalError, Mood, MoodTag, MutationReply};
use log::debug;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Loading,
    Ready,
    Saving,
    Deleting,
}

/// What the editor pane lets the user do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorControls {
    pub editable: bool,
    pub can_save: bool,
    pub can_delete: bool,
}

/// Editor for the entry of the selected date.
///
/// Responses are applied only while they still target the selected date and
/// the editor is waiting for that kind of response; anything else is stale
/// and dropped.
///
/// A date with a save or delete still in flight is not reloaded until that
/// mutation settles; the load is held back and handed out by
/// [`resume_load`](Self::resume_load).
#[derive(Debug)]
pub struct EntryEditor {
    state: EditorState,
    selected: Option<DateKey>,
    content: String,
    mood: Option<MoodTag>,
    is_new: bool,
    confirming_delete: bool,
    pending: HashSet<DateKey>,
    deferred_load: Option<DateKey>,
}

impl Default for EntryEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryEditor {
    pub fn new() -> Self {
        Self {
            state: EditorState::Idle,
            selected: None,
            content: String::new(),
            mood: None,
            is_new: true,
            confirming_delete: false,
            pending: HashSet::new(),
            deferred_load: None,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn selected(&self) -> Option<DateKey> {
        self.selected
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn mood(&self) -> Option<Mood> {
        self.mood.as_ref().and_then(MoodTag::known)
    }

    /// The mood as it will be saved, including tags outside [`Mood::ALL`].
    pub fn mood_tag(&self) -> Option<&MoodTag> {
        self.mood.as_ref()
    }

    /// Whether a save or delete for `date` is still waiting for its reply.
    pub fn is_pending(&self, date: DateKey) -> bool {
        self.pending.contains(&date)
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    pub fn controls(&self) -> EditorControls {
        let editable = self.selected.is_some() && self.state == EditorState::Ready;
        EditorControls {
            editable,
            can_save: editable,
            can_delete: editable && !self.is_new,
        }
    }

    /// Starts loading the entry for `date`. Returns `None` when that date is
    /// already being loaded, saved or deleted, and also when an earlier save
    /// or delete for it is still in flight; that load is deferred.
    pub fn select_date(&mut self, date: DateKey) -> Option<ApiRequest> {
        let busy = matches!(
            self.state,
            EditorState::Loading | EditorState::Saving | EditorState::Deleting
        );
        if busy && self.selected == Some(date) {
            debug!("Ignoring re-selection of {date} while {:?}", self.state);
            return None;
        }

        self.selected = Some(date);
        self.state = EditorState::Loading;
        self.clear_fields();
        if self.pending.contains(&date) {
            debug!("Deferring load of {date} until its pending change settles");
            self.deferred_load = Some(date);
            return None;
        }
        self.deferred_load = None;
        Some(ApiRequest::LoadEntry(date))
    }

    /// Releases the load held back for `date` once its last mutation has
    /// been answered, if the editor is still waiting for it.
    pub fn resume_load(&mut self, date: DateKey) -> Option<ApiRequest> {
        if self.deferred_load != Some(date) || self.pending.contains(&date) {
            return None;
        }
        self.deferred_load = None;
        if !self.expects(date, EditorState::Loading) {
            return None;
        }
        Some(ApiRequest::LoadEntry(date))
    }

    /// Applies a loaded entry. `None` when the response was stale.
    pub fn entry_loaded(
        &mut self,
        date: DateKey,
        result: Result<JournalEntry, JournalError>,
    ) -> Option<Result<(), JournalError>> {
        if !self.expects(date, EditorState::Loading) {
            debug!("Dropping stale entry load for {date}");
            return None;
        }

        match result {
            Ok(entry) => {
                self.content = entry.content.clone();
                self.mood = entry.mood_tag();
                self.is_new = entry.is_new;
                self.state = EditorState::Ready;
                Some(Ok(()))
            }
            Err(e) => {
                self.clear_fields();
                self.state = EditorState::Idle;
                Some(Err(e))
            }
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        if !self.controls().editable {
            return false;
        }
        self.content = content.into();
        true
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        if !self.controls().editable {
            return false;
        }
        self.content.push(c);
        true
    }

    pub fn backspace(&mut self) -> bool {
        if !self.controls().editable {
            return false;
        }
        self.content.pop().is_some()
    }

    /// Single-select among the fixed moods; `None` clears it. Local until
    /// the next save.
    pub fn select_mood(&mut self, mood: Option<Mood>) -> bool {
        if !self.controls().editable {
            return false;
        }
        self.mood = mood.map(MoodTag::from);
        true
    }

    /// Validates locally, then moves to `Saving`. Empty content never
    /// reaches the backend and leaves the editor untouched.
    pub fn save(&mut self) -> Result<ApiRequest, JournalError> {
        let date = self.ready_date("Nothing to save yet")?;
        if self.content.trim().is_empty() {
            return Err(JournalError::empty_content());
        }

        self.confirming_delete = false;
        self.state = EditorState::Saving;
        self.pending.insert(date);
        Ok(ApiRequest::Save {
            date,
            draft: EntryDraft {
                content: self.content.clone(),
                mood: self.mood.clone(),
            },
        })
    }

    pub fn saved(
        &mut self,
        date: DateKey,
        result: Result<MutationReply, JournalError>,
    ) -> Option<Result<MutationReply, JournalError>> {
        self.pending.remove(&date);
        if !self.expects(date, EditorState::Saving) {
            debug!("Dropping stale save reply for {date}");
            return None;
        }

        self.state = EditorState::Ready;
        if result.is_ok() {
            self.is_new = false;
        }
        Some(result)
    }

    /// First step of deletion: asks for confirmation.
    pub fn request_delete(&mut self) -> Result<(), JournalError> {
        self.ready_date("Nothing to delete")?;
        if self.is_new {
            return Err(JournalError::State("There is no saved entry for this date".to_string()));
        }
        self.confirming_delete = true;
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = false;
    }

    pub fn confirm_delete(&mut self) -> Result<ApiRequest, JournalError> {
        if !self.confirming_delete {
            return Err(JournalError::State("Deletion was not requested".to_string()));
        }
        self.confirming_delete = false;
        let date = self.ready_date("Nothing to delete")?;
        if self.is_new {
            return Err(JournalError::State("There is no saved entry for this date".to_string()));
        }

        self.state = EditorState::Deleting;
        self.pending.insert(date);
        Ok(ApiRequest::Delete(date))
    }

    pub fn deleted(
        &mut self,
        date: DateKey,
        result: Result<MutationReply, JournalError>,
    ) -> Option<Result<MutationReply, JournalError>> {
        self.pending.remove(&date);
        if !self.expects(date, EditorState::Deleting) {
            debug!("Dropping stale delete reply for {date}");
            return None;
        }

        self.state = EditorState::Ready;
        if result.is_ok() {
            self.clear_fields();
        }
        Some(result)
    }

    fn ready_date(&self, reason: &str) -> Result<DateKey, JournalError> {
        match (self.selected, self.state) {
            (Some(date), EditorState::Ready) => Ok(date),
            _ => Err(JournalError::State(reason.to_string())),
        }
    }

    fn expects(&self, date: DateKey, state: EditorState) -> bool {
        self.selected == Some(date) && self.state == state
    }

    fn clear_fields(&mut self) {
        self.content.clear();
        self.mood = None;
        self.is_new = true;
        self.confirming_delete = false;
    }
}
