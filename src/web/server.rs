use rocket::{Build, Rocket};

use crate::dispatch::Mailer;
use crate::web::api::server::ApiServer;
use crate::web::config::WebConfig;
use crate::web::frontend::server::FrontendServer;

pub trait Server {
    fn configure(self: Box<Self>, rocket_build: Rocket<Build>) -> Rocket<Build>;
}

pub fn build_server(web_config: WebConfig, mailer: Mailer) -> Rocket<Build> {
    let rocket_build = rocket::build().configure(
        rocket::Config::figment()
            .merge(("port", *web_config.port()))
            .merge(("limits", web_config.limits())),
    );

    let servers: Vec<Box<dyn Server>> = vec![
        Box::new(ApiServer::new(mailer)),
        Box::new(FrontendServer::new(web_config)),
    ];
    servers
        .into_iter()
        .fold(rocket_build, |rocket_build, server| server.configure(rocket_build))
}
