use crate::domain::{DateKey, EntryDraft, EntrySummary, JournalEntry, JournalError, MoodTag, MutationReply};
use crate::infrastructure::JournalApi;
use anyhow::Result;
use chrono::{DateTime, Utc};
use log::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Saved { mood: Option<MoodTag>, chars: usize },
    Deleted,
}

/// Context provided to mutation hooks
#[derive(Debug, Clone, PartialEq)]
pub struct MutationContext {
    pub date: DateKey,
    pub mutation: Mutation,
    pub at: DateTime<Utc>,
}

/// Trait for plugins that respond to entries being saved or deleted
pub trait MutationHook: Send + Sync {
    /// Called after the backend confirmed the mutation
    fn on_mutation(&self, context: &MutationContext) -> Result<()>;

    /// Human-readable name for this hook
    fn name(&self) -> &str;
}

/// Registry for managing mutation hooks
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Box<dyn MutationHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a new mutation hook
    pub fn register<H>(&mut self, hook: H)
    where
        H: MutationHook + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    /// Run every hook. A failing hook is logged and the rest still run.
    pub fn execute(&self, context: &MutationContext) {
        for hook in &self.hooks {
            if let Err(e) = hook.on_mutation(context) {
                warn!("Hook '{}' failed: {}", hook.name(), e);
            }
        }
    }

    /// List all registered hooks
    pub fn list_hooks(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }
}

/// Wraps a backend and fires hooks after successful saves and deletes.
pub struct HookedJournalApi<A> {
    inner: A,
    hooks: HookRegistry,
}

impl<A: JournalApi> HookedJournalApi<A> {
    pub fn new(inner: A, hooks: HookRegistry) -> Self {
        Self { inner, hooks }
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }
}

impl<A: JournalApi> JournalApi for HookedJournalApi<A> {
    fn list_entries(&self) -> Result<Vec<EntrySummary>, JournalError> {
        self.inner.list_entries()
    }

    fn get_entry(&self, date: DateKey) -> Result<JournalEntry, JournalError> {
        self.inner.get_entry(date)
    }

    fn save_entry(&self, date: DateKey, draft: &EntryDraft) -> Result<MutationReply, JournalError> {
        let reply = self.inner.save_entry(date, draft)?;
        self.hooks.execute(&MutationContext {
            date,
            mutation: Mutation::Saved {
                mood: draft.mood.clone(),
                chars: draft.content.trim().chars().count(),
            },
            at: Utc::now(),
        });
        Ok(reply)
    }

    fn delete_entry(&self, date: DateKey) -> Result<MutationReply, JournalError> {
        let reply = self.inner.delete_entry(date)?;
        self.hooks.execute(&MutationContext {
            date,
            mutation: Mutation::Deleted,
            at: Utc::now(),
        });
        Ok(reply)
    }
}
