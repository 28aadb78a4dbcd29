pub mod send_due_reminders;

use actix_web::web;
use send_due_reminders::check_due_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/delivery/check",
        web::post().to(check_due_reminders_controller),
    );
}
