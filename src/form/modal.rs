use crate::form::lead_form::LeadForm;
use crate::repository::catalog_repo::CatalogRepository;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Page-level scroll lock the modal takes while it is open.
pub trait PageScroll: Send + Sync {
    fn is_locked(&self) -> bool;
    fn set_locked(&self, locked: bool);
}

/// Scroll flag kept in memory, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct InMemoryPageScroll {
    locked: AtomicBool,
}

impl PageScroll for InMemoryPageScroll {
    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    fn set_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
    }
}

/// Locks page scrolling until dropped, then restores whatever was there before.
pub struct ScrollLock {
    page: Arc<dyn PageScroll>,
    previous: bool,
}

impl ScrollLock {
    pub fn acquire(page: Arc<dyn PageScroll>) -> Self {
        let previous = page.is_locked();
        page.set_locked(true);
        ScrollLock { page, previous }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.page.set_locked(self.previous);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Overlay,
    CloseButton,
    Escape,
    /// Another modal was opened on top.
    Replaced,
}

pub struct LeadModal {
    form: LeadForm,
    _scroll: ScrollLock,
}

impl LeadModal {
    pub fn open(catalog: Arc<dyn CatalogRepository>, preselected: Option<&str>, page: Arc<dyn PageScroll>) -> Self {
        let scroll = ScrollLock::acquire(page);
        debug!(preselected = ?preselected, "Lead modal opened");
        LeadModal {
            form: LeadForm::open(catalog, preselected),
            _scroll: scroll,
        }
    }

    pub fn form(&self) -> &LeadForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut LeadForm {
        &mut self.form
    }

    /// Closing works from any form state; the scroll lock goes with the modal.
    pub fn close(self, reason: CloseReason) {
        debug!(reason = ?reason, state = ?self.form.state(), "Lead modal closed");
    }
}

/// Holds the one modal that may be open on a page.
pub struct ModalHost {
    catalog: Arc<dyn CatalogRepository>,
    page: Arc<dyn PageScroll>,
    current: Option<LeadModal>,
}

impl ModalHost {
    pub fn new(catalog: Arc<dyn CatalogRepository>, page: Arc<dyn PageScroll>) -> Self {
        ModalHost { catalog, page, current: None }
    }

    /// Opens a fresh modal, discarding any open one first.
    pub fn open(&mut self, preselected: Option<&str>) -> &mut LeadModal {
        if let Some(previous) = self.current.take() {
            previous.close(CloseReason::Replaced);
        }
        let modal = LeadModal::open(self.catalog.clone(), preselected, self.page.clone());
        self.current.insert(modal)
    }

    /// Returns whether a modal was open.
    pub fn close(&mut self, reason: CloseReason) -> bool {
        match self.current.take() {
            Some(modal) => {
                modal.close(reason);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&LeadModal> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }
}
