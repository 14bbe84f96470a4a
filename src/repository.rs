use log::{debug, info, warn};

use crate::api::ProductApi;
use crate::error::{RepositoryError, ValidationErrors};
use crate::models::{Product, ProductDraft, ProductId, ProductPatch};

pub const MIN_BARCODE_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Empty,
    Loading,
    Ready,
    Failed(String),
}

/// In-memory copy of the product collection for one session.
///
/// A failed refresh keeps the last good list readable; only the state
/// records the failure.
pub struct ProductRepository<A> {
    api: A,
    items: Vec<Product>,
    selected: Option<Product>,
    state: LoadState,
    loaded_once: bool,
}

impl<A: ProductApi> ProductRepository<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            items: Vec::new(),
            selected: None,
            state: LoadState::Empty,
            loaded_once: false,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn products(&self) -> &[Product] {
        &self.items
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.items.iter().find(|product| &product.id == id)
    }

    /// The single product last loaded with [`fetch_by_id`](Self::fetch_by_id).
    pub fn selected(&self) -> Option<&Product> {
        self.selected.as_ref()
    }

    pub fn clear_selected(&mut self) {
        self.selected = None;
    }

    /// True when the list on hand survived a failed refresh.
    pub fn is_stale(&self) -> bool {
        matches!(self.state, LoadState::Failed(_)) && self.loaded_once
    }

    pub fn clear_error(&mut self) {
        if let LoadState::Failed(_) = self.state {
            self.state = if self.loaded_once {
                LoadState::Ready
            } else {
                LoadState::Empty
            };
        }
    }

    /// Replaces the whole list with the server's collection.
    pub async fn fetch_all(&mut self) -> Result<&[Product], RepositoryError> {
        self.state = LoadState::Loading;
        debug!("Loading products");

        match self.api.list_products().await {
            Ok(products) => {
                info!("Loaded {} products", products.len());
                self.items = products;
                self.loaded_once = true;
                self.state = LoadState::Ready;
                Ok(&self.items)
            }
            Err(err) => {
                let err = RepositoryError::Fetch(err);
                warn!("Keeping {} cached products after failed refresh", self.items.len());
                self.state = LoadState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Loads one product into the selected slot. The list is left alone.
    pub async fn fetch_by_id(&mut self, id: &ProductId) -> Result<&Product, RepositoryError> {
        let product = self.api.get_product(id).await.map_err(|err| {
            if err.is_not_found() {
                RepositoryError::NotFound(id.clone())
            } else {
                RepositoryError::Fetch(err)
            }
        })?;

        Ok(self.selected.insert(product))
    }

    /// Creates a product and puts the server's copy at the front of the list.
    pub async fn add(&mut self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let created = self
            .api
            .create_product(draft)
            .await
            .map_err(RepositoryError::Add)?;

        info!("Added product {}", created.id);
        self.items.retain(|product| product.id != created.id);
        self.items.insert(0, created.clone());
        Ok(created)
    }

    /// Sends `patch` and swaps the server's copy into place, keeping the
    /// product's position in the list.
    pub async fn update(
        &mut self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let updated = self
            .api
            .update_product(id, patch)
            .await
            .map_err(RepositoryError::Update)?;

        if let Some(slot) = self.items.iter_mut().find(|product| product.id == updated.id) {
            *slot = updated.clone();
        }
        if let Some(selected) = self.selected.as_mut().filter(|p| p.id == updated.id) {
            *selected = updated.clone();
        }

        debug!("Updated product {}", updated.id);
        Ok(updated)
    }

    /// Looks a product up by barcode. `Ok(None)` means no product carries it.
    pub async fn find_by_barcode(&self, code: &str) -> Result<Option<Product>, RepositoryError> {
        let code = code.trim();
        if code.chars().count() < MIN_BARCODE_LEN {
            return Err(ValidationErrors::single(
                "barcode",
                format!("Barcode must contain at least {} digits", MIN_BARCODE_LEN),
            )
            .into());
        }

        let matches = self
            .api
            .products_by_barcode(code)
            .await
            .map_err(RepositoryError::Fetch)?;

        if matches.len() > 1 {
            warn!("{} products share barcode {}", matches.len(), code);
        }
        Ok(matches.into_iter().next())
    }
}
