use crate::domain::{DateKey, EntryDraft, EntrySummary, JournalEntry, JournalError, MutationReply};
use crate::infrastructure::JournalApi;
use log::debug;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

/// A backend call requested by a controller. Controllers never do I/O
/// themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    LoadAll { seq: u64 },
    LoadEntry(DateKey),
    Save { date: DateKey, draft: EntryDraft },
    Delete(DateKey),
}

/// Outcome of an `ApiRequest`, tagged with what it targeted.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    EntriesLoaded {
        seq: u64,
        result: Result<Vec<EntrySummary>, JournalError>,
    },
    EntryLoaded {
        date: DateKey,
        result: Result<JournalEntry, JournalError>,
    },
    Saved {
        date: DateKey,
        result: Result<MutationReply, JournalError>,
    },
    Deleted {
        date: DateKey,
        result: Result<MutationReply, JournalError>,
    },
}

impl ApiRequest {
    pub fn execute(self, api: &dyn JournalApi) -> ApiResponse {
        match self {
            ApiRequest::LoadAll { seq } => ApiResponse::EntriesLoaded {
                seq,
                result: api.list_entries(),
            },
            ApiRequest::LoadEntry(date) => ApiResponse::EntryLoaded {
                date,
                result: api.get_entry(date),
            },
            ApiRequest::Save { date, draft } => ApiResponse::Saved {
                date,
                result: api.save_entry(date, &draft),
            },
            ApiRequest::Delete(date) => ApiResponse::Deleted {
                date,
                result: api.delete_entry(date),
            },
        }
    }
}

/// Runs each request on its own thread; responses are collected without
/// blocking the caller.
pub struct ThreadDispatcher {
    api: Arc<dyn JournalApi>,
    sender: Sender<ApiResponse>,
    receiver: Receiver<ApiResponse>,
    in_flight: usize,
}

impl ThreadDispatcher {
    pub fn new(api: Arc<dyn JournalApi>) -> Self {
        let (sender, receiver) = channel();
        Self {
            api,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    pub fn dispatch(&mut self, request: ApiRequest) {
        debug!("Dispatching {request:?}");
        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();
        self.in_flight += 1;

        std::thread::spawn(move || {
            let response = request.execute(api.as_ref());
            // The receiver is gone only when the view has shut down.
            let _ = sender.send(response);
        });
    }

    pub fn dispatch_all(&mut self, requests: impl IntoIterator<Item = ApiRequest>) {
        for request in requests {
            self.dispatch(request);
        }
    }

    /// Responses that have arrived since the last call.
    pub fn drain(&mut self) -> Vec<ApiResponse> {
        let responses: Vec<ApiResponse> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(responses.len());
        responses
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
