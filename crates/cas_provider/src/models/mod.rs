mod ticket;
mod user;
mod validation;

pub use ticket::*;
pub use user::*;
pub use validation::*;
