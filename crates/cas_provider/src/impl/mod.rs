pub mod login;
pub mod proxy;
pub mod proxy_callback;
pub mod response;
pub mod ticket;
pub mod validate;
