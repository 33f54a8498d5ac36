pub mod api;
pub mod client;
pub mod customers;
pub mod errors;
pub mod retry;
pub mod subscriptions;
pub mod types;
pub mod users;

pub use api::{CustomerDirectory, Subscriptions, UserDirectory};
pub use client::ResellerClient;
pub use customers::CustomerHandler;
pub use errors::ApiError;
pub use retry::RetryPolicy;
pub use subscriptions::SubscriptionHandler;
pub use users::UserHandler;
