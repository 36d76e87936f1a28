pub mod rusa_api;

pub use rusa_api::{RouteGateway, RusaClient};
