use crate::domain::{DateKey, EntryDraft, EntrySummary, JournalEntry, JournalError, MutationReply};
use crate::infrastructure::{JournalApi, check_reply};
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::{Method, StatusCode, redirect};
use serde::de::DeserializeOwned;

/// `JournalApi` over HTTP/JSON.
///
/// Redirects are not followed: the backend redirects unauthenticated
/// requests to its login page.
pub struct HttpJournalApi {
    client: Client,
    base_url: String,
    session: Option<String>,
}

impl HttpJournalApi {
    pub fn new(base_url: impl Into<String>, session: Option<String>) -> Result<Self, JournalError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| JournalError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn entry_path(date: DateKey) -> String {
        format!("/journal/entry/{date}")
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header(ACCEPT, "application/json");

        match &self.session {
            Some(session) => builder.header(COOKIE, format!("session={session}")),
            None => builder,
        }
    }

    fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Response, JournalError> {
        debug!("{method} {path}");

        let response = builder.send().map_err(|e| {
            warn!("{method} {path} failed: {e}");
            JournalError::Network(e.to_string())
        })?;

        let status = response.status();
        if status.is_redirection() || status == StatusCode::UNAUTHORIZED {
            warn!("{method} {path} answered {status}, session rejected");
            return Err(JournalError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<MutationReply>(&body)
                .ok()
                .and_then(|reply| reply.error.or(reply.message))
                .unwrap_or_else(|| status.to_string());
            warn!("{method} {path} answered {status}: {message}");
            return Err(JournalError::server(Some(status.as_u16()), message));
        }

        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, JournalError> {
        response
            .json::<T>()
            .map_err(|e| JournalError::Decode(e.to_string()))
    }
}

impl JournalApi for HttpJournalApi {
    fn list_entries(&self) -> Result<Vec<EntrySummary>, JournalError> {
        let path = "/journal/entries";
        let response = self.send(Method::GET, path, self.request(Method::GET, path))?;
        Self::decode(response)
    }

    fn get_entry(&self, date: DateKey) -> Result<JournalEntry, JournalError> {
        let path = Self::entry_path(date);
        let response = self.send(Method::GET, &path, self.request(Method::GET, &path))?;
        let entry: JournalEntry = Self::decode(response)?;

        if entry.date != date {
            return Err(JournalError::Decode(format!(
                "asked for {date}, got entry for {}",
                entry.date
            )));
        }
        Ok(entry)
    }

    fn save_entry(&self, date: DateKey, draft: &EntryDraft) -> Result<MutationReply, JournalError> {
        let path = Self::entry_path(date);
        let builder = self.request(Method::POST, &path).json(draft);
        let response = self.send(Method::POST, &path, builder)?;
        check_reply(Self::decode(response)?)
    }

    fn delete_entry(&self, date: DateKey) -> Result<MutationReply, JournalError> {
        let path = Self::entry_path(date);
        let response = self.send(Method::DELETE, &path, self.request(Method::DELETE, &path))?;
        check_reply(Self::decode(response)?)
    }
}
