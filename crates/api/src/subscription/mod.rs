mod create_push_subscription;
mod delete_push_subscription;
mod get_push_key;

use actix_web::web;
use create_push_subscription::create_push_subscription_controller;
use delete_push_subscription::delete_push_subscription_controller;
use get_push_key::get_push_key_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/push/key", web::get().to(get_push_key_controller));
    cfg.route(
        "/push/subscriptions",
        web::put().to(create_push_subscription_controller),
    );
    cfg.route(
        "/push/subscriptions",
        web::delete().to(delete_push_subscription_controller),
    );
}
