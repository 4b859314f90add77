// gemstone/src/orders/mod.rs

pub mod model;
pub mod placement;
pub mod service;
pub mod stats;
pub mod store;

pub use model::{NewOrder, Order, OrderItem, OrderStatus, PaymentInfo, PaymentStatus, ShippingAddress};
pub use placement::OrderPlacement;
pub use service::Orders;
pub use stats::{DailySales, DashboardStats};
pub use store::OrderStore;
