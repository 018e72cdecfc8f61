pub mod analytics;
pub mod order;
pub mod product;
pub mod promotion;
pub mod user;

pub use analytics::*;
pub use order::*;
pub use product::*;
pub use promotion::*;
pub use user::*;
