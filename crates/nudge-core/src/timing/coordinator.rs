//! Owner of every category's [`TimingModel`].
//!
//! Each category sits behind its own mutex so feedback for one category is
//! applied one update at a time while other categories proceed in parallel.
//! When a store is attached, models are loaded on first use and saved after
//! every mutation.
//!
//! Lock order: the category map or a single category first, the store last.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, TimeZone, Utc};

use super::model::TimingModel;
use crate::error::{CoreError, Result};
use crate::events::DeliveryEvent;
use crate::storage::TimingStore;

type SharedModel = Arc<Mutex<TimingModel>>;

fn lock<'a, T: ?Sized>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| CoreError::Custom(format!("{what} lock poisoned")))
}

#[derive(Default)]
pub struct TimingCoordinator {
    models: Mutex<HashMap<String, SharedModel>>,
    store: Option<Mutex<Box<dyn TimingStore + Send>>>,
}

impl TimingCoordinator {
    /// In-memory coordinator; nothing survives the process.
    pub fn new() -> Self {
        Self::default()
    }

    /// Coordinator backed by `store`.
    pub fn with_store(store: impl TimingStore + Send + 'static) -> Self {
        Self {
            models: Mutex::new(HashMap::new()),
            store: Some(Mutex::new(Box::new(store))),
        }
    }

    fn entry(&self, category: &str) -> Result<SharedModel> {
        let mut models = lock(&self.models, "timing model map")?;
        if let Some(model) = models.get(category) {
            return Ok(Arc::clone(model));
        }

        let model = match &self.store {
            Some(store) => lock(store, "timing store")?.load(category)?,
            None => None,
        }
        .unwrap_or_else(|| TimingModel::new(category));

        let shared = Arc::new(Mutex::new(model));
        models.insert(category.to_string(), Arc::clone(&shared));
        Ok(shared)
    }

    fn persist(&self, model: &TimingModel) -> Result<()> {
        if let Some(store) = &self.store {
            lock(store, "timing store")?.save(model)?;
        }
        Ok(())
    }

    /// Run `f` against the category's model while holding its lock, then
    /// persist the result.
    pub fn with_model<R>(
        &self,
        category: &str,
        f: impl FnOnce(&mut TimingModel) -> R,
    ) -> Result<R> {
        let shared = self.entry(category)?;
        let mut model = lock(&shared, "timing model")?;
        let out = f(&mut model);
        self.persist(&model)?;
        Ok(out)
    }

    /// Copy of the category's current model.
    pub fn snapshot(&self, category: &str) -> Result<TimingModel> {
        let shared = self.entry(category)?;
        let model = lock(&shared, "timing model")?;
        Ok(model.clone())
    }

    pub fn record_sent(&self, category: &str, at: DateTime<Utc>) -> Result<()> {
        self.with_model(category, |m| m.record_sent_at(at))
    }

    pub fn record_opened<Tz: TimeZone>(
        &self,
        category: &str,
        sent_at: &DateTime<Tz>,
        opened_at: &DateTime<Tz>,
    ) -> Result<()> {
        self.with_model(category, |m| m.record_opened(sent_at, opened_at))
    }

    pub fn record_dismissed<Tz: TimeZone>(
        &self,
        category: &str,
        sent_at: &DateTime<Tz>,
        dismissed_at: &DateTime<Tz>,
    ) -> Result<()> {
        self.with_model(category, |m| m.record_dismissed(sent_at, dismissed_at))
    }

    /// Feed one delivery outcome into its category's model.
    pub fn apply(&self, event: &DeliveryEvent) -> Result<()> {
        match event {
            DeliveryEvent::Sent { category, at, .. } => {
                self.record_sent(category, at.with_timezone(&Utc))
            }
            DeliveryEvent::Opened {
                category,
                sent_at,
                opened_at,
                ..
            } => self.record_opened(category, sent_at, opened_at),
            DeliveryEvent::Dismissed {
                category,
                sent_at,
                dismissed_at,
                ..
            } => self.record_dismissed(category, sent_at, dismissed_at),
        }
    }

    /// Best delivery time for `category` within the next `within_hours`.
    pub fn predict_best_time<Tz: TimeZone>(
        &self,
        category: &str,
        now: &DateTime<Tz>,
        within_hours: u32,
    ) -> Result<Option<DateTime<Tz>>> {
        let shared = self.entry(category)?;
        let model = lock(&shared, "timing model")?;
        Ok(model.predict_best_time(now, within_hours))
    }

    pub fn reset(&self, category: &str) -> Result<()> {
        self.with_model(category, TimingModel::reset)
    }

    /// Age every known model toward neutral.
    pub fn apply_decay_all(&self, factor: f64) -> Result<()> {
        for category in self.categories()? {
            self.with_model(&category, |m| m.apply_decay(factor))?;
        }
        Ok(())
    }

    /// Categories loaded in memory or present in the store, sorted.
    pub fn categories(&self) -> Result<Vec<String>> {
        let mut out: Vec<String> = lock(&self.models, "timing model map")?
            .keys()
            .cloned()
            .collect();
        if let Some(store) = &self.store {
            out.extend(lock(store, "timing store")?.categories()?);
        }
        out.sort();
        out.dedup();
        Ok(out)
    }
}
