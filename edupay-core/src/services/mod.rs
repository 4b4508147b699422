//! Request-scoped services: order creation, callback reconciliation,
//! and the transaction query surface.

pub mod payments;
pub mod seeder;
pub mod transactions;
pub mod webhooks;
