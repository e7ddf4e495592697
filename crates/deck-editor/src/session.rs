//! The editing session: single owner of the in-memory collection.
//!
//! Every mutation is one sequence point:
//!
//! 1. load the remote document (when nothing is loaded yet, or when
//!    `reload_before_write` is on and no local change is pending),
//! 2. apply the edit to a working copy,
//! 3. check the collection invariants, rejecting only violations the edit
//!    introduced (a stored document may already carry some),
//! 4. adopt the copy and save the whole document.
//!
//! A rejected edit or failed validation changes nothing. A failed save
//! leaves the local collection ahead of the remote one and marks it dirty;
//! the next successful save (including `retry_save`) carries it.
//!
//! Navigation and reads work on the loaded copy and never touch the store.

use crate::elements::{self, ElementDraft, ElementEdit};
use crate::lifecycle;
use crate::location::EditLocation;
use crate::navigator::SlideNavigator;
use crate::preview::PreviewSession;
use deck_core::{
    Collection, EditError, HeuristicDetector, ImageFile, LanguageDetector, Presentation,
    PresentationId, PresentationSummary, Violation, to_data_url, validate,
};
use deck_store::{RemoteStore, StoreError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The edit would have left the collection inconsistent.
    #[error("edit rejected, {} invariant violation(s): {}", .0.len(), first_violation(.0))]
    Invalid(Vec<Violation>),

    /// A read needed the collection before anything was loaded.
    #[error("nothing loaded yet")]
    NotLoaded,
}

fn first_violation(violations: &[Violation]) -> String {
    violations.first().map(ToString::to_string).unwrap_or_default()
}

/// The violations in `after` that `before` does not account for.
///
/// Matched by rule and message, one for one, so an edit that shifts ids or
/// indices does not turn an old violation into a new one.
fn introduced(before: &[Violation], after: Vec<Violation>) -> Vec<Violation> {
    let mut known: Vec<&Violation> = before.iter().collect();
    after
        .into_iter()
        .filter(|v| {
            match known
                .iter()
                .position(|k| k.rule == v.rule && k.message == v.message)
            {
                Some(i) => {
                    known.swap_remove(i);
                    false
                }
                None => true,
            }
        })
        .collect()
}

/// Session behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Reload the remote document before each write, so edits apply on top
    /// of whatever another writer saved last. Default: **true**.
    pub reload_before_write: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reload_before_write: true,
        }
    }
}

pub struct DeckSession<S, D = HeuristicDetector> {
    store: S,
    detector: D,
    config: SessionConfig,
    collection: Option<Collection>,
    /// Set when the local collection holds changes the store has not
    /// accepted yet.
    dirty: bool,
}

impl<S: RemoteStore> DeckSession<S> {
    pub fn new(store: S) -> Self {
        Self::with_detector(store, HeuristicDetector)
    }
}

impl<S: RemoteStore, D: LanguageDetector> DeckSession<S, D> {
    pub fn with_detector(store: S, detector: D) -> Self {
        Self {
            store,
            detector,
            config: SessionConfig::default(),
            collection: None,
            dirty: false,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ─── Reads ───────────────────────────────────────────────────────────

    /// Fetch the remote collection, replacing the local one. While a local
    /// change is unsaved the fetch is skipped and the local copy is returned
    /// as is; call `retry_save` first to pick up remote changes.
    pub async fn load(&mut self) -> Result<&Collection, SessionError> {
        if self.dirty {
            log::warn!("reload skipped: unsaved local changes");
        } else {
            let loaded = self.store.load().await?;
            log::debug!("session loaded {} presentations", loaded.len());
            self.collection = Some(loaded);
        }
        self.collection()
    }

    /// The loaded collection.
    pub fn collection(&self) -> Result<&Collection, SessionError> {
        self.collection.as_ref().ok_or(SessionError::NotLoaded)
    }

    pub fn presentation(&self, id: PresentationId) -> Result<&Presentation, SessionError> {
        Ok(self.collection()?.get(id)?)
    }

    /// Dashboard cards, in id order.
    pub fn summaries(&self) -> Result<Vec<PresentationSummary>, SessionError> {
        Ok(self.collection()?.summaries())
    }

    /// Open a presentation at its first slide, loading first.
    pub async fn open(&mut self, id: PresentationId) -> Result<SlideNavigator, SessionError> {
        self.open_at(EditLocation {
            presentation: id,
            slide: 0,
        })
        .await
    }

    /// Open at an addressed slide, loading first.
    pub async fn open_at(&mut self, location: EditLocation) -> Result<SlideNavigator, SessionError> {
        let len = self.load().await?.get(location.presentation)?.slides.len();
        Ok(SlideNavigator::new(location.presentation, location.slide, len)?)
    }

    /// A read-only preview over a copy of the loaded presentation. Later edits
    /// through this session do not reach it.
    pub fn preview(&self, id: PresentationId, start: usize) -> Result<PreviewSession, SessionError> {
        let snapshot = self.presentation(id)?.clone();
        Ok(PreviewSession::open(id, snapshot, start)?)
    }

    // ─── Sequence point ──────────────────────────────────────────────────

    async fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut Collection, &D) -> Result<T, EditError>,
    ) -> Result<T, SessionError> {
        let reload =
            self.collection.is_none() || (self.config.reload_before_write && !self.dirty);
        if reload {
            self.collection = Some(self.store.load().await?);
        }
        let mut working = self.collection()?.clone();
        let baseline = validate(&working).err().unwrap_or_default();

        let out = op(&mut working, &self.detector)?;
        if let Err(found) = validate(&working) {
            let fresh = introduced(&baseline, found);
            if !fresh.is_empty() {
                log::warn!("edit rejected: {}", first_violation(&fresh));
                return Err(SessionError::Invalid(fresh));
            }
            log::debug!("edit kept {} pre-existing violation(s)", baseline.len());
        }

        self.collection = Some(working);
        self.dirty = true;
        self.flush().await?;
        Ok(out)
    }

    async fn flush(&mut self) -> Result<(), SessionError> {
        let Some(collection) = &self.collection else {
            return Err(SessionError::NotLoaded);
        };
        match self.store.save(collection).await {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                log::warn!("save failed, local changes pending: {e}");
                Err(e.into())
            }
        }
    }

    /// Save the local collection again after a failed save. No-op when
    /// nothing is pending.
    pub async fn retry_save(&mut self) -> Result<(), SessionError> {
        if !self.dirty {
            return Ok(());
        }
        self.flush().await
    }

    // ─── Presentations ───────────────────────────────────────────────────

    pub async fn create_presentation(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<PresentationId, SessionError> {
        self.commit(|c, _| lifecycle::create_presentation(c, name, description))
            .await
    }

    pub async fn rename_presentation(
        &mut self,
        id: PresentationId,
        name: &str,
    ) -> Result<(), SessionError> {
        self.commit(|c, _| lifecycle::rename_presentation(c, id, name))
            .await
    }

    pub async fn delete_presentation(&mut self, id: PresentationId) -> Result<(), SessionError> {
        self.commit(|c, _| lifecycle::delete_presentation(c, id).map(|_| ()))
            .await
    }

    /// Replace the thumbnail with an uploaded image. Files that are not
    /// JPEG or PNG change nothing and return `false`.
    pub async fn change_thumbnail(
        &mut self,
        id: PresentationId,
        file: &ImageFile,
    ) -> Result<bool, SessionError> {
        let Some(data_url) = to_data_url(file) else {
            return Ok(false);
        };
        self.commit(|c, _| lifecycle::change_thumbnail(c, id, Some(data_url)))
            .await
    }

    // ─── Slides ──────────────────────────────────────────────────────────

    /// Append a slide. The navigator keeps its position.
    pub async fn add_slide(&mut self, nav: &mut SlideNavigator) -> Result<(), SessionError> {
        let id = nav.presentation();
        let len = self.commit(|c, _| lifecycle::add_slide(c, id)).await?;
        nav.slide_added(len);
        Ok(())
    }

    /// Delete the navigator's current slide and move it accordingly.
    pub async fn delete_slide(&mut self, nav: &mut SlideNavigator) -> Result<(), SessionError> {
        let (id, index) = (nav.presentation(), nav.current());
        let len = self.commit(|c, _| lifecycle::delete_slide(c, id, index)).await?;
        // The reload may have changed the count; decide "was last" against it.
        nav.sync_len(len + 1);
        nav.slide_deleted(index, len);
        Ok(())
    }

    /// Set the current slide's background, backfilling default slides with
    /// `default_color`.
    pub async fn set_background(
        &mut self,
        nav: &SlideNavigator,
        default_color: &str,
        slide_color: &str,
    ) -> Result<(), SessionError> {
        let (id, index) = (nav.presentation(), nav.current());
        self.commit(|c, _| lifecycle::set_background(c, id, index, default_color, slide_color))
            .await
    }

    // ─── Elements ────────────────────────────────────────────────────────

    /// Add an element to the current slide. Returns its index.
    pub async fn add_element(
        &mut self,
        nav: &SlideNavigator,
        draft: ElementDraft,
    ) -> Result<usize, SessionError> {
        let (id, index) = (nav.presentation(), nav.current());
        self.commit(|c, detector| elements::add_element(c.get_mut(id)?, index, draft, detector))
            .await
    }

    /// Apply one completed element edit on the current slide.
    pub async fn edit_element(
        &mut self,
        nav: &SlideNavigator,
        edit: ElementEdit,
    ) -> Result<(), SessionError> {
        let (id, index) = (nav.presentation(), nav.current());
        self.commit(|c, detector| elements::apply_edit(c.get_mut(id)?, index, edit, detector))
            .await
    }

    /// Bring a navigator in line with the loaded collection after a reload
    /// changed the slide count.
    pub fn refresh(&self, nav: &mut SlideNavigator) -> Result<(), SessionError> {
        let len = self.presentation(nav.presentation())?.slides.len();
        nav.sync_len(len);
        Ok(())
    }
}
