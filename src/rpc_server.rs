//! Bookmark RPC Server: JSON-RPC over stdin/stdout for a host UI.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"bookmark.toggle_verse", "params":{"chapterId":2, ...}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr. On EOF, pending writes are flushed before exit.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use quran_bookmarks::app::App;
use quran_bookmarks::logging::init_logging;
use quran_bookmarks::rpc_handler::handle_method;
use quran_bookmarks::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

use serde_json::{json, Value};
use tracing::{error, info, warn};

fn respond(out: &mut impl Write, response: &Value) -> io::Result<()> {
    writeln!(out, "{}", response)?;
    out.flush()
}

fn serve(app: &App) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    respond(&mut out, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}))?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Rejecting malformed request");
                respond(&mut out, &json!({"id": null, "error": format!("parse error: {}", e)}))?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(app, method, &params) {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        respond(&mut out, &response)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let mut settings_engine = SettingsEngine::new(None);
    let settings_result = settings_engine.load();
    // Logging falls back to defaults when the settings file is unreadable.
    if let Err(e) = init_logging(&settings_engine.get_settings().logging) {
        eprintln!("{}", e);
    }
    if let Err(e) = settings_result {
        warn!(error = %e, "Ignoring unreadable settings file");
    }

    let app = match App::with_settings(settings_engine.get_settings().clone()) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "Failed to start bookmark session");
            return ExitCode::FAILURE;
        }
    };

    let served = serve(&app);
    app.store.flush_blocking();
    info!(stats = ?app.store.persistence_stats(), "Bookmark RPC server stopped");

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "RPC stream failed");
            ExitCode::FAILURE
        }
    }
}
