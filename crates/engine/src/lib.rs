pub mod lifecycle;
pub mod reconcile;
pub mod settings;
pub mod smart_money;
