// SPDX-License-Identifier: MPL-2.0
//! Wallpaper navigation over the active catalog.
//!
//! [`NavigationEngine`] moves the "current" wallpaper forward (sequentially or
//! at random), backward through the session history, or re-validates it in
//! place. Every candidate is resolved through the [`AssetCache`] and decoded
//! before it is accepted; candidates that fail are removed from the catalog
//! and the next one is tried, until one succeeds or the catalog runs out.
//!
//! # Busy gate
//!
//! One operation runs at a time. The session sits behind an async mutex that
//! is only ever *tried*: a call made while another operation is in flight
//! returns [`NavigationOutcome::Busy`] immediately without touching any
//! state. Each candidate attempt starts with a yield to the scheduler so a
//! host event loop keeps running during long fetch and decode chains.

pub mod history;

use crate::application::port::{BackgroundApplier, HttpClient, ImageDecoder};
use crate::cache::{AssetCache, AssetKind};
use crate::catalog::Catalog;
use crate::compositor::{self, CanvasSpec};
use crate::config::Config;
use crate::domain::media::RawImage;
use crate::domain::wallpaper::{BackgroundColor, DisplayMode, WallpaperEntry};
use crate::error::{Error, Result};
use history::History;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Behavior switches and render settings used by navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationSettings {
    pub change_randomly: bool,
    /// Preview with the full image instead of the thumbnail.
    pub high_resolution_thumbnails: bool,
    /// Move files of purged local entries to the trash.
    pub trash_purged_files: bool,
    pub canvas: CanvasSpec,
    pub mode: DisplayMode,
    pub background: BackgroundColor,
}

impl NavigationSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            change_randomly: config.rotation.change_randomly,
            high_resolution_thumbnails: config.rotation.high_resolution_thumbnails,
            trash_purged_files: config.rotation.trash_purged_files,
            canvas: config.screen.canvas(),
            mode: config.display.mode,
            background: config.display.background_color,
        }
    }
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Result of a navigation operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Another operation was in flight; nothing changed.
    Busy,
    /// `entry` at `index` is now current.
    Selected { index: usize, entry: WallpaperEntry },
    /// No usable entry was found; there is no current wallpaper.
    Exhausted,
}

impl NavigationOutcome {
    #[must_use]
    pub fn entry(&self) -> Option<&WallpaperEntry> {
        match self {
            NavigationOutcome::Selected { entry, .. } => Some(entry),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, NavigationOutcome::Busy)
    }
}

struct Session {
    catalog: Catalog,
    history: History,
    /// Source of the current entry.
    current: Option<String>,
    rng: StdRng,
    /// Catalog changed since it was last saved.
    dirty: bool,
}

impl Session {
    fn current_index(&self) -> Option<usize> {
        self.current
            .as_deref()
            .and_then(|source| self.catalog.position(source))
    }

    /// Makes `source` current and records it in the history.
    fn select(&mut self, source: &str) -> NavigationOutcome {
        match (self.catalog.position(source), self.catalog.get(source)) {
            (Some(index), Some(entry)) => {
                let entry = entry.clone();
                self.history.push(entry.source());
                self.current = Some(entry.source().to_string());
                tracing::debug!(index, source = entry.source(), "selected wallpaper");
                NavigationOutcome::Selected { index, entry }
            }
            _ => {
                self.current = None;
                NavigationOutcome::Exhausted
            }
        }
    }

    fn record_dimensions(&mut self, entry: &WallpaperEntry, image: &RawImage) {
        if entry.dimensions().is_none()
            && self
                .catalog
                .set_dimensions(entry.source(), &image.dimensions_label())
        {
            self.dirty = true;
        }
    }

    fn purge(&mut self, entry: &WallpaperEntry, cause: &Error, trash: bool) {
        tracing::warn!(source = entry.source(), error = %cause, "removing unusable wallpaper");
        self.catalog.remove(entry.source(), trash);
        self.dirty = true;
    }

    fn persist(&mut self) {
        if !self.dirty {
            return;
        }
        match self.catalog.save() {
            Ok(()) => self.dirty = false,
            Err(err) => tracing::warn!(error = %err, "could not save catalog"),
        }
    }
}

fn pick_index(rng: &mut StdRng, randomly: bool, origin: Option<usize>, count: usize) -> usize {
    if randomly {
        if count == 1 {
            return 0;
        }
        loop {
            let index = rng.gen_range(0..count);
            if Some(index) != origin {
                return index;
            }
        }
    }
    match origin {
        Some(index) if index + 1 < count => index + 1,
        _ => 0,
    }
}

pub struct NavigationEngine<C, D, A> {
    session: Mutex<Session>,
    cache: AssetCache<C>,
    decoder: Arc<D>,
    applier: Arc<A>,
    settings: NavigationSettings,
}

impl<C, D, A> NavigationEngine<C, D, A>
where
    C: HttpClient,
    D: ImageDecoder,
    A: BackgroundApplier,
{
    pub fn new(
        catalog: Catalog,
        cache: AssetCache<C>,
        decoder: Arc<D>,
        applier: Arc<A>,
        settings: NavigationSettings,
    ) -> Self {
        Self {
            session: Mutex::new(Session {
                catalog,
                history: History::new(),
                current: None,
                rng: StdRng::from_entropy(),
                dirty: false,
            }),
            cache,
            decoder,
            applier,
            settings,
        }
    }

    /// Uses a deterministic random sequence.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.session.get_mut().rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Marks `source` as current without validating it, for example to
    /// restore the previous session. Ignored if the catalog lacks it.
    #[must_use]
    pub fn with_current(mut self, source: &str) -> Self {
        let session = self.session.get_mut();
        if let Some(entry) = session.catalog.get(source) {
            session.current = Some(entry.source().to_string());
        }
        self
    }

    #[must_use]
    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    /// The current entry. Waits for an in-flight operation to finish.
    pub async fn current(&self) -> Option<WallpaperEntry> {
        let session = self.session.lock().await;
        session
            .current
            .as_deref()
            .and_then(|source| session.catalog.get(source))
            .cloned()
    }

    /// Snapshot of the catalog entries in display order.
    pub async fn entries(&self) -> Vec<WallpaperEntry> {
        self.session.lock().await.catalog.iter().cloned().collect()
    }

    pub async fn catalog_len(&self) -> usize {
        self.session.lock().await.catalog.len()
    }

    pub async fn can_go_back(&self) -> bool {
        self.session.lock().await.history.can_go_back()
    }

    /// Swaps in a different catalog, clearing the history and the current
    /// entry. Returns `false` (and changes nothing) while busy.
    pub fn replace_catalog(&self, catalog: Catalog) -> bool {
        let Ok(mut session) = self.session.try_lock() else {
            return false;
        };
        session.persist();
        session.catalog = catalog;
        session.history.clear();
        session.current = None;
        session.dirty = false;
        true
    }

    /// Advances to the next usable wallpaper, optionally applying it.
    ///
    /// The search starts after `start_index` (or after the current entry).
    /// In random mode any entry other than the starting one may be picked.
    ///
    /// # Errors
    ///
    /// Candidate failures are absorbed by purging the candidate. Only a
    /// [`Error::Geometry`] from composition is returned.
    pub async fn goto_next(
        &self,
        apply: bool,
        start_index: Option<usize>,
    ) -> Result<NavigationOutcome> {
        let Ok(mut session) = self.session.try_lock() else {
            return Ok(NavigationOutcome::Busy);
        };
        let outcome = self.next_locked(&mut session, apply, start_index).await;
        session.persist();
        outcome
    }

    /// Steps back to the previous entry of the history, optionally applying
    /// it. Entries that no longer resolve are purged and skipped.
    ///
    /// # Errors
    ///
    /// See [`NavigationEngine::goto_next`].
    pub async fn goto_previous(&self, apply: bool) -> Result<NavigationOutcome> {
        let Ok(mut session) = self.session.try_lock() else {
            return Ok(NavigationOutcome::Busy);
        };
        let outcome = self.previous_locked(&mut session, apply).await;
        session.persist();
        outcome
    }

    /// Re-validates the current entry. If it no longer resolves it is purged
    /// and navigation moves on to the entry that took its place.
    ///
    /// # Errors
    ///
    /// See [`NavigationEngine::goto_next`].
    pub async fn goto_current(&self) -> Result<NavigationOutcome> {
        let Ok(mut session) = self.session.try_lock() else {
            return Ok(NavigationOutcome::Busy);
        };
        let outcome = self.current_locked(&mut session).await;
        session.persist();
        outcome
    }

    /// Makes `source` current and validates it like [`Self::goto_current`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolve`] if `source` is not in the catalog.
    pub async fn select(&self, source: &str) -> Result<NavigationOutcome> {
        let Ok(mut session) = self.session.try_lock() else {
            return Ok(NavigationOutcome::Busy);
        };
        let Some(stored) = session.catalog.get(source).map(|e| e.source().to_string()) else {
            return Err(Error::Resolve(format!("{source}: not in the catalog")));
        };
        session.current = Some(stored);
        let outcome = self.current_locked(&mut session).await;
        session.persist();
        outcome
    }

    /// Applies the current entry as desktop background without moving.
    ///
    /// Returns [`NavigationOutcome::Exhausted`] when there is no current
    /// entry.
    ///
    /// # Errors
    ///
    /// Any resolve, decode, composition or apply failure is returned as-is;
    /// the entry stays in the catalog.
    pub async fn set_current_as_background(&self) -> Result<NavigationOutcome> {
        let Ok(mut session) = self.session.try_lock() else {
            return Ok(NavigationOutcome::Busy);
        };
        let Some(entry) = session
            .current
            .as_deref()
            .and_then(|source| session.catalog.get(source))
            .cloned()
        else {
            return Ok(NavigationOutcome::Exhausted);
        };

        let result = self.apply_entry(&mut session, &entry).await;
        session.persist();
        result.map(|()| session.select(entry.source()))
    }

    async fn next_locked(
        &self,
        session: &mut Session,
        apply: bool,
        start_index: Option<usize>,
    ) -> Result<NavigationOutcome> {
        let origin = start_index.or_else(|| session.current_index());
        let previous = session.current.take();

        loop {
            tokio::task::yield_now().await;

            let count = session.catalog.len();
            if count == 0 {
                tracing::info!("no usable wallpaper left in the catalog");
                return Ok(NavigationOutcome::Exhausted);
            }
            let index = pick_index(&mut session.rng, self.settings.change_randomly, origin, count);
            let Some(entry) = session.catalog.entry_at(index).cloned() else {
                return Ok(NavigationOutcome::Exhausted);
            };

            match self.attempt(session, &entry, apply).await {
                Ok(()) => return Ok(session.select(entry.source())),
                Err(err) if err.is_candidate_failure() => {
                    session.purge(&entry, &err, self.settings.trash_purged_files);
                }
                Err(err) => {
                    // Nothing moved, so the old entry stays current.
                    session.current = previous.filter(|source| session.catalog.contains(source));
                    return Err(err);
                }
            }
        }
    }

    async fn previous_locked(
        &self,
        session: &mut Session,
        apply: bool,
    ) -> Result<NavigationOutcome> {
        session.current = None;

        loop {
            tokio::task::yield_now().await;

            session.history.pop();
            let Some(source) = session.history.top().map(str::to_string) else {
                return Ok(NavigationOutcome::Exhausted);
            };
            let Some(entry) = session.catalog.get(&source).cloned() else {
                tracing::debug!(source = %source, "history entry no longer in catalog");
                continue;
            };

            match self.attempt(session, &entry, apply).await {
                Ok(()) => return Ok(session.select(entry.source())),
                Err(err) if err.is_candidate_failure() => {
                    session.purge(&entry, &err, self.settings.trash_purged_files);
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn current_locked(&self, session: &mut Session) -> Result<NavigationOutcome> {
        let Some(index) = session.current_index() else {
            session.current = None;
            return Ok(NavigationOutcome::Exhausted);
        };
        let Some(entry) = session.catalog.entry_at(index).cloned() else {
            return Ok(NavigationOutcome::Exhausted);
        };

        tokio::task::yield_now().await;
        match self.attempt(session, &entry, false).await {
            Ok(()) => Ok(session.select(entry.source())),
            Err(err) if err.is_candidate_failure() => {
                session.purge(&entry, &err, self.settings.trash_purged_files);
                session.current = None;
                // The entry after the purged one now sits at `index`.
                self.next_locked(session, false, index.checked_sub(1)).await
            }
            Err(err) => Err(err),
        }
    }

    /// Resolves and decodes the preview of `entry`, then applies the full
    /// image when `apply` is set.
    async fn attempt(&self, session: &mut Session, entry: &WallpaperEntry, apply: bool) -> Result<()> {
        let high_res = self.settings.high_resolution_thumbnails;
        let (reference, kind) = if high_res {
            (entry.source(), AssetKind::Full)
        } else {
            (entry.thumbnail_source(), AssetKind::Thumbnail)
        };

        let path = self.cache.resolve(reference, kind).await?;
        let preview = self.decode(path).await?;
        if high_res || entry.thumbnail_is_source() {
            session.record_dimensions(entry, &preview);
        }

        if apply {
            self.apply_entry(session, entry).await?;
        }
        Ok(())
    }

    async fn apply_entry(&self, session: &mut Session, entry: &WallpaperEntry) -> Result<()> {
        let path = self.cache.resolve(entry.source(), AssetKind::Full).await?;
        let image = self.decode(path).await?;
        session.record_dimensions(entry, &image);

        let settings = self.settings;
        let applier = Arc::clone(&self.applier);
        tokio::task::spawn_blocking(move || {
            let canvas = compositor::compose(
                &image,
                settings.canvas,
                settings.mode,
                settings.background,
            )?;
            applier.apply(&canvas)
        })
        .await?
    }

    async fn decode(&self, path: PathBuf) -> Result<RawImage> {
        let decoder = Arc::clone(&self.decoder);
        tokio::task::spawn_blocking(move || decoder.decode(&path)).await?
    }
}
