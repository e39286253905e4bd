#[cfg(feature = "rocket_impl")]
mod rocket;
