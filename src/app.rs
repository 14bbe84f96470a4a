use log::{info, warn};

use crate::api::ProductApi;
use crate::config::DEFAULT_RECENT_EDITS_LIMIT;
use crate::edit::{StockEdit, SubmitOutcome};
use crate::error::{EditError, RepositoryError, SessionError};
use crate::forms::ProductForm;
use crate::models::{Product, ProductId, Session, WarehouseStats};
use crate::repository::ProductRepository;
use crate::session::SessionStore;
use crate::stats::{recent_edits, warehouse_stats};

/// Home screen data for the signed-in warehouseman.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub stats: WarehouseStats,
    pub recent: Vec<Product>,
}

/// Everything one signed-in session works with. Built at sign-in and torn
/// down at sign-out; nothing here is global.
pub struct Inventory<A> {
    session: Session,
    repository: ProductRepository<A>,
    recent_limit: usize,
}

impl<A: ProductApi> Inventory<A> {
    pub fn start(api: A, session: Session) -> Self {
        info!(
            "Starting session for warehouseman {} at warehouse {}",
            session.warehouseman_id, session.warehouse_id
        );
        Self {
            session,
            repository: ProductRepository::new(api),
            recent_limit: DEFAULT_RECENT_EDITS_LIMIT,
        }
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn repository(&self) -> &ProductRepository<A> {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut ProductRepository<A> {
        &mut self.repository
    }

    pub async fn refresh(&mut self) -> Result<(), RepositoryError> {
        self.repository.fetch_all().await.map(|_| ())
    }

    pub fn dashboard(&self) -> Dashboard {
        let products = self.repository.products();
        Dashboard {
            stats: warehouse_stats(products, self.session.warehouse_id),
            recent: recent_edits(products, self.session.warehouseman_id, self.recent_limit),
        }
    }

    /// `None` when the product is not loaded or this warehouse has no entry
    /// for it.
    pub fn begin_edit(&self, id: &ProductId) -> Option<StockEdit> {
        let product = self.repository.get(id)?;
        StockEdit::open(product, &self.session)
    }

    /// Submits the edit, re-reads the product from the server, and hands the
    /// confirmed copy to `on_update`.
    pub async fn submit_edit<F>(
        &mut self,
        edit: &mut StockEdit,
        on_update: F,
    ) -> Result<SubmitOutcome, EditError>
    where
        F: FnOnce(&Product),
    {
        let outcome = edit.submit(&mut self.repository).await?;

        if let SubmitOutcome::Saved(saved) = &outcome {
            match self.repository.fetch_by_id(&saved.id).await {
                Ok(confirmed) => on_update(confirmed),
                Err(err) => {
                    warn!("Could not confirm update of {}: {}", saved.id, err);
                    on_update(saved);
                }
            }
        }

        Ok(outcome)
    }

    pub async fn add_product(&mut self, form: &ProductForm) -> Result<Product, RepositoryError> {
        let draft = form.validate(&self.session)?;
        self.repository.add(&draft).await
    }

    pub async fn lookup_barcode(&self, code: &str) -> Result<Option<Product>, RepositoryError> {
        self.repository.find_by_barcode(code).await
    }

    /// Ends the session and forgets it in `store`.
    pub fn end<S: SessionStore + ?Sized>(self, store: &S) -> Result<(), SessionError> {
        info!("Ending session for warehouseman {}", self.session.warehouseman_id);
        store.clear()
    }
}
