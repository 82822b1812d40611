use crate::application::{
    Config, EditorState, EntryStore, JournalController, MonthView, StatusKind, Theme,
    ThreadDispatcher, drive,
};
use crate::domain::{CalendarRenderer, DateKey, Mood, TextRenderer, today};
use crate::infrastructure::{
    ActivityLogHook, HookRegistry, HookedJournalApi, HttpJournalApi, JournalApi,
};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use log::info;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

pub struct JournalApp {
    api: Arc<dyn JournalApi>,
    config: Config,
    theme: Theme,
}

impl JournalApp {
    pub fn with_default_plugins(config: Config) -> Result<Self> {
        // Set up hook registry with default plugins
        let mut hook_registry = HookRegistry::new();
        if let Some(path) = &config.activity_log {
            hook_registry.register(ActivityLogHook::new(path.clone()));
        }
        info!("Registered hooks: {:?}", hook_registry.list_hooks());

        let http = HttpJournalApi::new(config.api_url.clone(), config.session.clone())?;
        let api = HookedJournalApi::new(http, hook_registry);
        Ok(Self::with_api(config, Arc::new(api)))
    }

    pub fn without_plugins(config: Config) -> Result<Self> {
        let http = HttpJournalApi::new(config.api_url.clone(), config.session.clone())?;
        Ok(Self::with_api(config, Arc::new(http)))
    }

    pub fn with_api(config: Config, api: Arc<dyn JournalApi>) -> Self {
        let theme = Theme::by_name(&config.theme);
        Self { api, config, theme }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn run_tui(&self, date: Option<NaiveDate>) -> Result<()> {
        let today = today();
        let (controller, requests) = JournalController::mount_at(today, date.unwrap_or(today));
        let dispatcher = ThreadDispatcher::new(Arc::clone(&self.api));

        let mut view = MonthView::new(controller, requests, dispatcher, self.theme.clone())?;
        view.run()?;
        Ok(())
    }

    pub fn list(&self, out: &mut dyn Write) -> Result<()> {
        let mut store = EntryStore::new();
        let seq = store.begin_load();
        store.apply_load(seq, self.api.list_entries());

        if let Some(error) = store.error() {
            bail!("{error}");
        }
        if store.is_empty() {
            writeln!(out, "{}", self.theme.palette.muted.paint("No entries yet"))?;
            return Ok(());
        }

        for entry in store.entries() {
            writeln!(
                out,
                "{} {}{}",
                self.theme.palette.heading.paint_bold(&entry.date.label()),
                entry.glyph().map(|g| format!("{g} ")).unwrap_or_default(),
                entry.preview.replace('\n', " ")
            )?;
        }
        Ok(())
    }

    pub fn show(&self, date: NaiveDate, out: &mut dyn Write) -> Result<()> {
        let key = DateKey::new(date);
        let entry = self.api.get_entry(key)?;

        writeln!(out, "{}", self.theme.palette.heading.paint_bold(&key.label()))?;
        if entry.is_new {
            writeln!(out, "{}", self.theme.palette.muted.paint("No entry"))?;
            return Ok(());
        }

        if let Some(mood) = entry.mood() {
            writeln!(out, "Mood: {} {}", mood.glyph(), mood)?;
        }
        writeln!(out)?;
        writeln!(out, "{}", entry.content)?;
        Ok(())
    }

    /// Saves through the same editor the calendar view uses, so validation
    /// and messages match. Without `mood` the stored mood is kept.
    pub fn write(
        &self,
        date: NaiveDate,
        content: &str,
        mood: Option<Mood>,
        out: &mut dyn Write,
    ) -> Result<()> {
        let mut controller = self.open(date)?;
        controller.set_content(content);
        if mood.is_some() {
            controller.select_mood(mood);
        }

        let request = controller.save(Instant::now());
        drive(&mut controller, self.api.as_ref(), request);
        self.report(&controller, out)
    }

    pub fn delete(&self, date: NaiveDate, out: &mut dyn Write) -> Result<()> {
        let mut controller = self.open(date)?;
        if controller.editor().is_new() {
            bail!("No entry for {}", DateKey::new(date).label());
        }

        let now = Instant::now();
        controller.request_delete(now);
        let request = controller.confirm_delete(now);
        drive(&mut controller, self.api.as_ref(), request);
        self.report(&controller, out)
    }

    pub fn month(&self, date: NaiveDate, out: &mut dyn Write) -> Result<()> {
        let (mut controller, requests) = JournalController::mount_at(today(), date);
        drive(&mut controller, self.api.as_ref(), requests);
        write!(out, "{}", TextRenderer.render(&controller.calendar()))?;
        Ok(())
    }

    /// Mounts a controller on `date` and waits for the entry to load.
    fn open(&self, date: NaiveDate) -> Result<JournalController> {
        let (mut controller, requests) = JournalController::mount_at(today(), date);
        drive(&mut controller, self.api.as_ref(), requests);

        if controller.editor().state() != EditorState::Ready {
            let reason = controller
                .status()
                .visible(Instant::now())
                .map(|m| m.text.clone())
                .unwrap_or_else(|| "Could not load entry".to_string());
            bail!(reason);
        }
        Ok(controller)
    }

    fn report(&self, controller: &JournalController, out: &mut dyn Write) -> Result<()> {
        match controller.status().visible(Instant::now()) {
            Some(message) if message.kind == StatusKind::Error => bail!(message.text.clone()),
            Some(message) => {
                writeln!(out, "{}", self.theme.palette.success.paint(&message.text))?;
                Ok(())
            }
            None => Ok(()),
        }
    }
}
