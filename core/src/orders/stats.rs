// gemstone/src/orders/stats.rs

//! Admin dashboard aggregation.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::model::{Order, OrderStatus};
use crate::accounts::User;

pub const RECENT_LIMIT: usize = 5;
pub const SALES_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
  /// `YYYY-MM-DD` in UTC.
  pub date: String,
  pub total_sales: Decimal,
  pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  pub total_revenue: Decimal,
  pub total_orders: usize,
  pub total_products: i64,
  pub total_users: i64,
  pub pending_orders_count: usize,
  pub recent_orders: Vec<Order>,
  pub recent_users: Vec<User>,
  pub sales_by_date: Vec<DailySales>,
}

impl DashboardStats {
  /// `orders` may come in any order; `recent_users` is taken as given.
  pub fn compute(
    mut orders: Vec<Order>,
    total_products: i64,
    total_users: i64,
    recent_users: Vec<User>,
    now: DateTime<Utc>,
  ) -> Self {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

    let total_revenue = orders
      .iter()
      .fold(Decimal::ZERO, |acc, o| acc.saturating_add(o.total));
    let pending_orders_count = orders.iter().filter(|o| o.status == OrderStatus::Pending).count();
    let sales_by_date = sales_by_date(&orders, now);

    Self {
      total_revenue,
      total_orders: orders.len(),
      total_products,
      total_users,
      pending_orders_count,
      recent_orders: orders.into_iter().take(RECENT_LIMIT).collect(),
      recent_users,
      sales_by_date,
    }
  }
}

fn sales_by_date(orders: &[Order], now: DateTime<Utc>) -> Vec<DailySales> {
  let since = now - Duration::days(SALES_WINDOW_DAYS);
  let mut days: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
  for order in orders.iter().filter(|o| o.created_at >= since) {
    let entry = days
      .entry(order.created_at.format("%Y-%m-%d").to_string())
      .or_insert((Decimal::ZERO, 0));
    entry.0 = entry.0.saturating_add(order.total);
    entry.1 += 1;
  }
  days
    .into_iter()
    .map(|(date, (total_sales, count))| DailySales {
      date,
      total_sales,
      count,
    })
    .collect()
}
