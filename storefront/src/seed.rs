// storefront/src/seed.rs

//! Demo catalog and accounts, loaded at startup when `SEED_DB=true`.

use chrono::Utc;
use gemstone::accounts::{Address, NewUser, Role};
use gemstone::catalog::{NewCategory, NewProduct};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::Result as AppResult;
use crate::services::auth_service;
use crate::state::AppState;

const CATEGORIES: &[(&str, &str)] = &[
  ("Rings", "Beautiful rings for all occasions"),
  ("Necklaces", "Elegant necklaces that make a statement"),
  ("Bracelets", "Stylish bracelets to complement any outfit"),
  ("Earrings", "Stunning earrings for everyday wear or special occasions"),
  ("Watches", "Precision timepieces that combine style and function"),
];

/// name, description, price in cents, category, stock, featured, discount
type SeedProduct = (&'static str, &'static str, i64, &'static str, i32, bool, i32);

const PRODUCTS: &[SeedProduct] = &[
  ("Diamond Engagement Ring", "A stunning 1-carat diamond ring set in 14k white gold, perfect for that special moment.", 299_999, "Rings", 10, true, 0),
  ("Gold Wedding Band", "Classic 18k gold wedding band, 4mm wide. Simple, elegant, and timeless.", 79_999, "Rings", 25, false, 5),
  ("Sapphire Statement Ring", "Bold and beautiful sapphire ring surrounded by small diamonds in a white gold setting.", 129_999, "Rings", 8, true, 10),
  ("Pearl Pendant Necklace", "Elegant freshwater pearl pendant on a sterling silver chain. A classic piece for any occasion.", 12_999, "Necklaces", 30, true, 0),
  ("Diamond Heart Necklace", "A beautiful heart-shaped pendant with pave diamonds in 14k rose gold.", 89_999, "Necklaces", 15, true, 5),
  ("Gold Chain", "24-inch 14k gold chain with lobster clasp closure. Perfect for everyday wear.", 49_999, "Necklaces", 20, false, 0),
  ("Tennis Bracelet", "Classic diamond tennis bracelet in 14k white gold.", 199_999, "Bracelets", 12, true, 0),
  ("Silver Charm Bracelet", "Sterling silver charm bracelet with a lobster clasp.", 8_999, "Bracelets", 50, false, 0),
  ("Hoop Earrings", "2-inch sterling silver hoop earrings. Lightweight and comfortable for all-day wear.", 7_999, "Earrings", 40, false, 10),
  ("Pearl Drop Earrings", "Elegant freshwater pearl drop earrings with sterling silver posts. Perfect for weddings and special occasions.", 14_999, "Earrings", 35, true, 5),
  ("Classic Automatic Watch", "Sophisticated automatic movement watch with leather strap. Sapphire crystal and exhibition caseback.", 129_999, "Watches", 15, true, 0),
  ("Sport Chronograph Watch", "Multifunctional chronograph watch with silicone strap. Water-resistant to 100m.", 49_999, "Watches", 20, false, 10),
];

/// first name, last name, email, password, role, street, city, state, zip
type SeedUser = (&'static str, &'static str, &'static str, &'static str, Role, &'static str, &'static str, &'static str, &'static str);

const USERS: &[SeedUser] = &[
  ("John", "Doe", "john@example.com", "password123", Role::Customer, "123 Main St", "New York", "NY", "10001"),
  ("Jane", "Smith", "jane@example.com", "password123", Role::Customer, "456 Park Ave", "Los Angeles", "CA", "90001"),
  ("Admin", "User", "admin@example.com", "admin123", Role::Admin, "789 Admin St", "Chicago", "IL", "60001"),
];

/// Loads the demo data unless the catalog already has categories.
#[instrument(name = "seed::run", skip(app_state), err(Display))]
pub async fn run(app_state: &AppState) -> AppResult<()> {
  if !app_state.catalog.categories().await?.is_empty() {
    info!("Catalog already populated, skipping seed data.");
    return Ok(());
  }

  let mut category_ids: HashMap<&str, Uuid> = HashMap::new();
  for (name, description) in CATEGORIES {
    let category = app_state
      .catalog
      .create_category(NewCategory {
        name: name.to_string(),
        description: Some(description.to_string()),
        image: None,
      })
      .await?;
    category_ids.insert(*name, category.id);
  }

  for (name, description, cents, category, stock, featured, discount) in PRODUCTS {
    let Some(category_id) = category_ids.get(category).copied() else {
      continue;
    };
    app_state
      .catalog
      .create_product(NewProduct {
        name: name.to_string(),
        description: description.to_string(),
        price: Decimal::new(*cents, 2),
        category: category_id,
        stock: *stock,
        images: Vec::new(),
        featured: *featured,
        discount: *discount,
      })
      .await?;
  }

  for (first_name, last_name, email, password, role, street, city, state, zip_code) in USERS {
    let new_user = NewUser {
      first_name: first_name.to_string(),
      last_name: last_name.to_string(),
      email: email.to_string(),
      password: password.to_string(),
      phone: None,
      address: Some(Address {
        street: street.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        zip_code: zip_code.to_string(),
        country: "USA".to_string(),
      }),
    };
    let hash = auth_service::hash_password(&new_user.password)?;
    app_state.users.insert_user(new_user.into_user(hash, *role, Utc::now())).await?;
  }

  info!(
    categories = CATEGORIES.len(),
    products = PRODUCTS.len(),
    users = USERS.len(),
    "Seed data loaded."
  );
  Ok(())
}
