//! The local shopping cart. The storefront sells one item per order, so the cart holds at most one line.
use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};
use checkout_engine::db_types::OrderItem;
use checkout_server::data_objects::CreatePaymentRequest;
use cko_common::Amount;
use dirs::home_dir;
use log::*;
use serde::{Deserialize, Serialize};

const CART_DIR: &str = ".checkout_tools";
const CART_FILE: &str = "cart.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub item: Option<OrderItem>,
}

impl Cart {
    /// Puts `item` in the cart, replacing whatever was there. Returns the replaced item.
    pub fn add(&mut self, item: OrderItem) -> Option<OrderItem> {
        self.item.replace(item)
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    pub fn total(&self) -> Amount {
        self.item.as_ref().map(OrderItem::line_total).unwrap_or_default()
    }

    pub fn checkout_request(&self) -> Result<CreatePaymentRequest> {
        let item = self.item.clone().ok_or_else(|| anyhow!("The cart is empty. Add an item with `cart add` first."))?;
        let total = item.line_total();
        Ok(CreatePaymentRequest { items: vec![item], total })
    }
}

/// Reads and writes the cart as a JSON file.
pub struct CartStore {
    path: PathBuf,
}

impl CartStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// `~/.checkout_tools/cart.json`. The directory is created, readable by the owner only, if it is missing.
    pub fn default_location() -> io::Result<Self> {
        let home = home_dir().ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Home directory not found"))?;
        let dir = home.join(CART_DIR);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            set_permissions(&dir, 0o700)?;
        }
        Ok(Self::new(dir.join(CART_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing cart file is an empty cart.
    pub fn load(&self) -> Result<Cart> {
        if !self.path.exists() {
            return Ok(Cart::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let cart = serde_json::from_str(&data)
            .map_err(|e| anyhow!("The cart file {} is damaged. {e}", self.path.display()))?;
        Ok(cart)
    }

    pub fn save(&self, cart: &Cart) -> Result<()> {
        let data = serde_json::to_string_pretty(cart)?;
        fs::write(&self.path, data)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            debug!("Cart cleared");
        }
        Ok(())
    }
}

fn set_permissions(path: &Path, perms: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_mode(perms);
        fs::set_permissions(path, permissions)?;
    }
    #[cfg(not(unix))]
    let _ = (path, perms);
    Ok(())
}
