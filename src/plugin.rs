use std::sync::Arc;

use serde_json::{Map, Value};
use tauri::ipc::Response;
use tauri::plugin::{Builder, TauriPlugin};
use tauri::{Manager, Runtime, State};

use crate::config::PluginConfig;
use crate::dispatcher::{Dispatcher, MethodHandler, Reply};
use crate::error::MethodError;

pub const PLUGIN_NAME: &str = "photo-gallery";

/// Registers the gallery commands, reachable from the webview as
/// `plugin:photo-gallery|invoke`.
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![invoke])
        .setup(|app, _api| {
            let config = PluginConfig::load().unwrap_or_else(|e| {
                log::warn!("Falling back to default gallery config: {:#}", e);
                PluginConfig::default()
            });
            app.manage(Arc::new(Dispatcher::from_config(&config)));
            Ok(())
        })
        .build()
}

/// Scans and decodes run on the blocking pool. Thumbnails travel as raw
/// bytes (an `ArrayBuffer` in the webview), everything else as JSON.
#[tauri::command]
async fn invoke(
    dispatcher: State<'_, Arc<Dispatcher>>,
    method: String,
    args: Option<Map<String, Value>>,
) -> Result<Response, MethodError> {
    let dispatcher = Arc::clone(&dispatcher);
    let args = args.unwrap_or_default();
    let reply = tauri::async_runtime::spawn_blocking(move || dispatcher.invoke(&method, &args))
        .await
        .map_err(|e| MethodError::Internal(e.to_string()))??;
    into_response(reply)
}

fn into_response(reply: Reply) -> Result<Response, MethodError> {
    match reply {
        Reply::Bytes(bytes) => Ok(Response::new(bytes)),
        other => serde_json::to_string(&other)
            .map(Response::new)
            .map_err(|e| MethodError::Internal(e.to_string())),
    }
}
