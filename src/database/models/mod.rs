pub mod account;
pub mod affiliate;
pub mod business;
pub mod curated_list;
pub mod customer;
pub mod notification;
pub mod offer;
pub mod points;
pub mod punch_card;
pub mod receipt;
pub mod reward;

pub use account::Account;
pub use affiliate::{AffiliateAttribution, AffiliateLink};
pub use business::Business;
pub use curated_list::{CuratedList, CuratedListEntry};
pub use customer::Customer;
pub use notification::Notification;
pub use offer::{Deal, DiscountOffer, ExclusiveOffer};
pub use points::PointEntry;
pub use punch_card::{PunchCard, PunchCardCustomer, PunchCardPunch};
pub use receipt::Receipt;
pub use reward::{Redemption, Reward};
