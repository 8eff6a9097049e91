use portico_common::SET_RENDER_HANDLER;

use crate::schema::PorticoConfig;

pub(crate) fn validate_client(errors: &mut Vec<String>, config: &PorticoConfig) {
    let handler = config.client.render_handler.trim();
    if handler.is_empty() {
        errors.push("client.render_handler must not be empty".into());
    } else if handler == SET_RENDER_HANDLER {
        // Handlers see messages before the protocol does, so this name
        // would shadow the bind request.
        errors.push(format!(
            "client.render_handler must not be the reserved name '{SET_RENDER_HANDLER}'"
        ));
    }

    if config.client.start_url.trim().is_empty() {
        errors.push("client.start_url must not be empty".into());
    }
}
