use rocket::{Build, Rocket};

use crate::dispatch::Mailer;
use crate::web::api::upload_controller;
use crate::web::server::Server;

pub struct ApiServer {
    mailer: Mailer,
}

impl ApiServer {
    pub fn new(mailer: Mailer) -> Self {
        Self { mailer }
    }
}

impl Server for ApiServer {
    fn configure(self: Box<Self>, rocket_build: Rocket<Build>) -> Rocket<Build> {
        rocket_build
            .manage(self.mailer)
            .mount(
                "/",
                routes![
                    upload_controller::upload,
                    upload_controller::upload_without_form
                ],
            )
    }
}
