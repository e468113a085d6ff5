use rocket::fs::FileServer;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

use crate::web::config::WebConfig;
use crate::web::frontend::frontend_controller;
use crate::web::server::Server;

const STATIC_FILES_FOLDER: &str = "./public/static";

pub struct FrontendServer {
    web_config: WebConfig,
}

impl FrontendServer {
    pub fn new(web_config: WebConfig) -> Self {
        Self { web_config }
    }
}

impl Server for FrontendServer {
    fn configure(self: Box<Self>, rocket_build: Rocket<Build>) -> Rocket<Build> {
        rocket_build
            .manage(self.web_config)
            .mount("/", routes![frontend_controller::index])
            .mount("/", FileServer::from(STATIC_FILES_FOLDER))
            .register("/", catchers![frontend_controller::not_found])
            .attach(Template::fairing())
    }
}
