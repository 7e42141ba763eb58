pub mod notifications;
pub mod points;
pub mod punch_cards;
pub mod receipts;
pub mod rewards;
