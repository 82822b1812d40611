use crate::domain::{DateKey, EntryDraft, EntrySummary, JournalEntry, JournalError, MutationReply};

/// The journal backend as seen by the client.
///
/// Implementations are shared with worker threads, hence `Send + Sync`.
pub trait JournalApi: Send + Sync {
    /// `GET /journal/entries`, newest first.
    fn list_entries(&self) -> Result<Vec<EntrySummary>, JournalError>;

    /// `GET /journal/entry/{date}`. A date without an entry yields a blank
    /// entry flagged `is_new`.
    fn get_entry(&self, date: DateKey) -> Result<JournalEntry, JournalError>;

    /// `POST /journal/entry/{date}`, creating or updating.
    fn save_entry(&self, date: DateKey, draft: &EntryDraft) -> Result<MutationReply, JournalError>;

    /// `DELETE /journal/entry/{date}`.
    fn delete_entry(&self, date: DateKey) -> Result<MutationReply, JournalError>;
}

impl<T: JournalApi + ?Sized> JournalApi for Box<T> {
    fn list_entries(&self) -> Result<Vec<EntrySummary>, JournalError> {
        (**self).list_entries()
    }

    fn get_entry(&self, date: DateKey) -> Result<JournalEntry, JournalError> {
        (**self).get_entry(date)
    }

    fn save_entry(&self, date: DateKey, draft: &EntryDraft) -> Result<MutationReply, JournalError> {
        (**self).save_entry(date, draft)
    }

    fn delete_entry(&self, date: DateKey) -> Result<MutationReply, JournalError> {
        (**self).delete_entry(date)
    }
}

/// Turns a 2xx reply carrying `success: false` into an error.
pub fn check_reply(reply: MutationReply) -> Result<MutationReply, JournalError> {
    if reply.success {
        return Ok(reply);
    }
    let message = reply
        .error
        .or(reply.message)
        .unwrap_or_else(|| "Request was not successful".to_string());
    Err(JournalError::server(None, message))
}
