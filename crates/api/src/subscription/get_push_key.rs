use crate::error::RemindError;
use actix_web::{web, HttpResponse};
use remind_api_structs::get_push_key::*;
use remind_infra::Context;

/// Hands out the VAPID public key clients pass to the platform push
/// registration, so the key never has to be baked into a client build.
pub async fn get_push_key_controller(
    ctx: web::Data<Context>,
) -> Result<HttpResponse, RemindError> {
    let public_key = ctx.config.vapid.public_key.clone();
    if public_key.is_empty() {
        return Err(RemindError::NotFound(
            "Push delivery is not configured on this server".into(),
        ));
    }
    Ok(HttpResponse::Ok().json(APIResponse { public_key }))
}
