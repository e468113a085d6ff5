mod dispatch;
mod error;
mod recipients;
mod tools;
mod web;

#[macro_use]
extern crate rocket;

use crate::web::start_servers;

#[launch]
fn rocket() -> _ {
    env_logger::init();

    match start_servers() {
        Ok(rocket) => rocket,
        Err(error) => {
            error!("{error}\n{error:#?}");
            panic!("Initialization failed, aborting.");
        }
    }
}
