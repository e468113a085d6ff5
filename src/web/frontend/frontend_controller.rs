use rocket::{Request, State};
use rocket_dyn_templates::{Template, context};

use crate::web::config::WebConfig;

#[get("/")]
pub async fn index(web_config: &State<WebConfig>) -> Template {
    Template::render(
        "index",
        context! {
            title: "Bulk mailer",
            max_upload_size: web_config.max_upload_size(),
        },
    )
}

#[catch(404)]
pub async fn not_found(req: &Request<'_>) -> Template {
    Template::render(
        "error/404",
        context! {
            uri: req.uri()
        },
    )
}
