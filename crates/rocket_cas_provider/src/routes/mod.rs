use rocket::Route;

pub mod proxy;
pub mod proxy_validate;
pub mod service_validate;
pub mod validate;

/// Query parameters of the validation endpoints
#[derive(FromForm, Debug, Default)]
pub struct ValidationQuery {
    pub service: Option<String>,
    pub ticket: Option<String>,

    /// Proxy callback URL, ignored by `/validate`
    #[field(name = "pgtUrl")]
    pub pgt_url: Option<String>,
}

pub fn routes() -> Vec<Route> {
    routes![
        validate::validate,
        service_validate::service_validate,
        proxy_validate::proxy_validate,
        proxy::proxy
    ]
}
