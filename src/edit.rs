//! One warehouseman adjusting their own warehouse's quantity for one product.
//!
//! ```text
//! open ──► Open ──inc/dec──► Dirty ──submit──► Submitting ──ok──► Closed
//!           │                  ▲                    │
//!           │                  └──────── err ───────┘
//!           └── submit (unchanged) / cancel ──────────────────► Closed
//! ```
//!
//! A submit whose future is dropped before the server answers leaves the edit
//! `Dirty`, ready to be submitted again.
//!
//! Writes are last-write-wins: the patch carries the whole `stocks` array from
//! the snapshot taken at `open`, with only this warehouse's quantity changed,
//! and the history with one record prepended.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::api::ProductApi;
use crate::error::EditError;
use crate::models::{EditRecord, Product, ProductPatch, Session, StockEntry};
use crate::repository::ProductRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// Quantity equals the value captured at open.
    Open,
    /// Quantity differs from the value captured at open.
    Dirty,
    Submitting,
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing changed, so nothing was sent.
    Unchanged,
    /// The server's copy after the update.
    Saved(Product),
}

#[derive(Debug, Clone)]
pub struct StockEdit {
    snapshot: Product,
    session: Session,
    entry: usize,
    original: u32,
    quantity: u32,
    state: EditState,
    last_error: Option<String>,
}

impl StockEdit {
    /// Starts an edit, or returns `None` when the session's warehouse holds
    /// no stock entry for this product.
    pub fn open(product: &Product, session: &Session) -> Option<Self> {
        let entry = product
            .stocks
            .iter()
            .position(|stock| stock.id == session.warehouse_id)?;
        let original = product.stocks[entry].quantity;

        debug!(
            "Opened stock edit of {} at warehouse {} (quantity {})",
            product.id, session.warehouse_id, original
        );

        Some(Self {
            snapshot: product.clone(),
            session: session.clone(),
            entry,
            original,
            quantity: original,
            state: EditState::Open,
            last_error: None,
        })
    }

    pub fn product(&self) -> &Product {
        &self.snapshot
    }

    pub fn stock(&self) -> &StockEntry {
        &self.snapshot.stocks[self.entry]
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn original_quantity(&self) -> u32 {
        self.original
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == EditState::Closed
    }

    /// Message of the last failed submit, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn increment(&mut self) {
        self.adjust(|quantity| quantity.saturating_add(1));
    }

    /// Never goes below zero.
    pub fn decrement(&mut self) {
        self.adjust(|quantity| quantity.saturating_sub(1));
    }

    fn adjust(&mut self, step: impl FnOnce(u32) -> u32) {
        if !matches!(self.state, EditState::Open | EditState::Dirty) {
            debug!("Ignoring quantity change on {:?} edit", self.state);
            return;
        }
        self.quantity = step(self.quantity);
        self.state = if self.quantity == self.original {
            EditState::Open
        } else {
            EditState::Dirty
        };
    }

    /// Jumps straight to `quantity`, as if stepped there one unit at a time.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.adjust(|_| quantity);
    }

    /// Moves the quantity by `delta` units in one step, clamped to `0..=u32::MAX`.
    pub fn shift(&mut self, delta: i64) {
        let target = i64::from(self.quantity).saturating_add(delta);
        self.set_quantity(u32::try_from(target.max(0)).unwrap_or(u32::MAX));
    }

    /// Drops any local change without talking to the server.
    pub fn cancel(&mut self) {
        self.quantity = self.original;
        self.state = EditState::Closed;
    }

    /// The update to send for the current quantity, stamped with `record`.
    pub fn patch(&self, record: EditRecord) -> ProductPatch {
        let mut stocks = self.snapshot.stocks.clone();
        stocks[self.entry].quantity = self.quantity;

        let mut edited_by = Vec::with_capacity(self.snapshot.edited_by.len() + 1);
        edited_by.push(record);
        edited_by.extend(self.snapshot.edited_by.iter().cloned());

        ProductPatch {
            stocks: Some(stocks),
            edited_by: Some(edited_by),
            ..ProductPatch::from(&self.snapshot)
        }
    }

    pub async fn submit<A: ProductApi>(
        &mut self,
        repository: &mut ProductRepository<A>,
    ) -> Result<SubmitOutcome, EditError> {
        self.submit_at(repository, Utc::now()).await
    }

    /// Like [`submit`](Self::submit) with an explicit edit time.
    pub async fn submit_at<A: ProductApi>(
        &mut self,
        repository: &mut ProductRepository<A>,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, EditError> {
        match self.state {
            EditState::Closed | EditState::Submitting => return Err(EditError::Closed),
            EditState::Open | EditState::Dirty => {}
        }

        if self.quantity == self.original {
            self.state = EditState::Closed;
            return Ok(SubmitOutcome::Unchanged);
        }

        let patch = self.patch(EditRecord::at(self.session.warehouseman_id, now));
        let in_flight = InFlight::begin(&mut self.state);

        match repository.update(&self.snapshot.id, &patch).await {
            Ok(product) => {
                in_flight.settle(EditState::Closed);
                info!(
                    "Warehouseman {} set {} at warehouse {} from {} to {}",
                    self.session.warehouseman_id,
                    self.snapshot.id,
                    self.session.warehouse_id,
                    self.original,
                    self.quantity
                );
                self.last_error = None;
                Ok(SubmitOutcome::Saved(product))
            }
            Err(err) => {
                in_flight.settle(EditState::Dirty);
                warn!("Stock update of {} failed: {}", self.snapshot.id, err);
                let err = EditError::from(err);
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

/// Marks an edit as submitting. If the submit future is dropped before the
/// update settles, the edit falls back to `Dirty` with its quantity intact.
struct InFlight<'a> {
    state: &'a mut EditState,
}

impl<'a> InFlight<'a> {
    fn begin(state: &'a mut EditState) -> Self {
        *state = EditState::Submitting;
        Self { state }
    }

    fn settle(self, next: EditState) {
        *self.state = next;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if *self.state == EditState::Submitting {
            *self.state = EditState::Dirty;
        }
    }
}
