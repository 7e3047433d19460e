use crate::domain::model::{Product, ShippingBox};
use crate::domain::ports::ShippingApi;
use std::collections::HashMap;

/// Products indexed by name.
///
/// Names iterate in the order they were first seen. A repeated name keeps
/// its position but takes the later record's data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl Inventory {
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut inventory = Self::default();
        for product in products {
            inventory.insert(product);
        }
        inventory
    }

    pub fn insert(&mut self, product: Product) {
        match self.index.get(&product.product_name) {
            Some(&slot) => self.products[slot] = product,
            None => {
                self.index
                    .insert(product.product_name.clone(), self.products.len());
                self.products.push(product);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Product> {
        self.index.get(name).map(|&slot| &self.products[slot])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.products.iter().map(|p| p.product_name.as_str())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub products: usize,
    pub boxes: usize,
    pub inventory_loaded: bool,
    pub boxes_loaded: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedData {
    pub inventory: Inventory,
    pub boxes: Vec<ShippingBox>,
    pub summary: LoadSummary,
}

/// Fetches inventory and boxes concurrently.
///
/// Never fails: a failed fetch is logged and its slot stays empty.
pub async fn load<A: ShippingApi + ?Sized>(api: &A) -> LoadedData {
    let (inventory_result, boxes_result) = tokio::join!(api.fetch_inventory(), api.fetch_boxes());

    let mut summary = LoadSummary::default();

    let inventory = match inventory_result {
        Ok(products) => {
            summary.inventory_loaded = true;
            Inventory::from_products(products)
        }
        Err(e) => {
            tracing::error!("Error fetching inventory data: {}", e);
            Inventory::default()
        }
    };

    let boxes = match boxes_result {
        Ok(boxes) => {
            summary.boxes_loaded = true;
            boxes
        }
        Err(e) => {
            tracing::error!("Error fetching box data: {}", e);
            Vec::new()
        }
    };

    summary.products = inventory.len();
    summary.boxes = boxes.len();
    tracing::debug!(
        "Loaded {} products and {} boxes",
        summary.products,
        summary.boxes
    );

    LoadedData {
        inventory,
        boxes,
        summary,
    }
}
