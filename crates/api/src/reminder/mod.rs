mod create_reminder;
mod delete_reminder;
mod get_reminder_by_item;
mod list_due_reminders;
mod mark_reminder_sent;
mod reschedule_reminder;

use actix_web::web;
use create_reminder::create_reminder_controller;
use delete_reminder::delete_reminder_controller;
use get_reminder_by_item::get_reminder_by_item_controller;
use list_due_reminders::list_due_reminders_controller;
use mark_reminder_sent::mark_reminder_sent_controller;
use reschedule_reminder::reschedule_reminder_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::post().to(create_reminder_controller));
    cfg.route(
        "/reminders/due",
        web::get().to(list_due_reminders_controller),
    );
    cfg.route(
        "/reminders/item/{item_id}",
        web::get().to(get_reminder_by_item_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::put().to(reschedule_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}/sent",
        web::post().to(mark_reminder_sent_controller),
    );
}
