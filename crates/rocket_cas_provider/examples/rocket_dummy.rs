//! Run example with `cargo run --example rocket_dummy --features example`
//!
//! Every submitted username is accepted, do not use this for anything real.

#[macro_use]
extern crate rocket;

#[cfg(feature = "example")]
mod demo {
    use cas_provider::{models::User, CasProvider, Result};
    use quick_xml::escape::escape;
    use rocket::form::Form;
    use rocket::response::content::RawHtml;
    use rocket::response::Redirect;
    use rocket::State;

    #[derive(FromForm)]
    pub struct LoginForm {
        lt: String,
        username: String,
        service: Option<String>,
    }

    /// Login form carrying the login ticket and service through the POST
    pub fn render_login_form(login_ticket: &str, service: Option<&str>) -> String {
        format!(
            "<form method=\"post\" action=\"/cas/login\">\
             <input type=\"hidden\" name=\"lt\" value=\"{}\">\
             <input type=\"hidden\" name=\"service\" value=\"{}\">\
             <input name=\"username\"><button>Login</button></form>",
            escape(login_ticket),
            escape(service.unwrap_or_default())
        )
    }

    #[get("/login?<service>")]
    pub async fn login_form(
        cas: &State<CasProvider>,
        service: Option<&str>,
    ) -> Result<RawHtml<String>> {
        let login_ticket = cas.create_login_ticket().await?;
        Ok(RawHtml(render_login_form(&login_ticket.id, service)))
    }

    #[post("/login", data = "<form>")]
    pub async fn login(cas: &State<CasProvider>, form: Form<LoginForm>) -> Result<Redirect> {
        let form = form.into_inner();
        let user = User {
            id: form.username.clone(),
            username: form.username,
            email: None,
        };

        let service = form.service.as_deref().filter(|service| !service.is_empty());
        Ok(match cas.login(&form.lt, user, service).await? {
            Some(redirect) => Redirect::found(redirect.to_string()),
            None => Redirect::to("/cas/login"),
        })
    }
}

#[cfg(feature = "example")]
#[launch]
async fn rocket() -> _ {
    use cas_provider::database::{Database, DummyDb};
    use cas_provider::Migration;
    use rocket::figment::providers::{Format as _, Toml};
    use rocket::figment::Figment;

    let database = Database::Dummy(DummyDb::default());
    database
        .run_migration(Migration::M2024_10_01CreateTicketCollections)
        .await
        .unwrap();

    let config = Figment::new()
        .merge(Toml::file("cas.toml"))
        .extract()
        .unwrap();

    let cas = cas_provider::CasProvider {
        database,
        config,
        ..Default::default()
    };

    let mut routes = rocket_cas_provider::routes::routes();
    routes.append(&mut routes![demo::login_form, demo::login]);

    rocket::build().manage(cas).mount("/cas", routes)
}

#[cfg(not(feature = "example"))]
fn main() {
    panic!("Enable `example` feature to run this example!");
}
