//! Server flows and file operations.
//!
//! Every network call follows the same shape: clone the client, spawn the
//! future on the runtime, park the result in a shared slot. The event loop
//! picks results up on the next tick.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::debug;

use crate::controller::{Controller, ExecutionView, NoticeKind, UiMode};
use crate::document::Document;
use crate::files;
use crate::protocol::AnalysisPayload;

impl Controller {
    pub(crate) fn start_probe(&mut self) {
        if !self.config.check_connection {
            return;
        }
        let api = self.api.clone();
        let result = Arc::new(Mutex::new(None));
        let result_clone = result.clone();
        self.runtime.spawn(async move {
            let up = api.check_connection().await;
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(up);
            }
        });
        self.pending_probe = Some(result);
    }

    pub(crate) fn start_example_fetch(&mut self) {
        let api = self.api.clone();
        let result = Arc::new(Mutex::new(None));
        let result_clone = result.clone();
        self.runtime.spawn(async move {
            let res = api.fetch_examples().await;
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(res);
            }
        });
        self.pending_examples = Some(result);
    }

    /// Submit the buffer for analysis. Ignored while a previous analysis
    /// is still in flight.
    pub(crate) fn analyze(&mut self) {
        if self.busy {
            return;
        }
        if self.document.text.trim().is_empty() {
            self.notice("Escribe código para analizar", NoticeKind::Error);
            return;
        }
        self.busy = true;
        let api = self.api.clone();
        let code = self.document.text.clone();
        let result = Arc::new(Mutex::new(None));
        let result_clone = result.clone();
        self.runtime.spawn(async move {
            let res = api.evaluate(&code).await;
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(res);
            }
        });
        self.pending_analysis = Some(result);
    }

    pub(crate) fn execute(&mut self) {
        if self.document.text.trim().is_empty() {
            self.notice("Escribe código para ejecutar", NoticeKind::Error);
            return;
        }
        let api = self.api.clone();
        let code = self.document.text.clone();
        let result = Arc::new(Mutex::new(None));
        let result_clone = result.clone();
        self.runtime.spawn(async move {
            let res = api.execute(&code).await;
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(res);
            }
        });
        self.pending_execution = Some(result);
    }

    /// Drain any async results that landed since the last tick.
    pub(crate) fn check_pending_requests(&mut self) {
        let analysis = self
            .pending_analysis
            .as_ref()
            .and_then(|p| p.try_lock().ok())
            .and_then(|mut g| g.take());
        if let Some(result) = analysis {
            self.pending_analysis = None;
            match result {
                Ok(payload) => self.finish_analysis(payload),
                Err(err) => {
                    self.busy = false;
                    self.notice(
                        format!("Error al analizar código: {err}"),
                        NoticeKind::Error,
                    );
                }
            }
        }

        let execution = self
            .pending_execution
            .as_ref()
            .and_then(|p| p.try_lock().ok())
            .and_then(|mut g| g.take());
        if let Some(result) = execution {
            self.pending_execution = None;
            match result {
                Ok(payload) => {
                    if payload.success {
                        self.notice("Código ejecutado", NoticeKind::Success);
                    } else {
                        self.notice("Error en ejecución", NoticeKind::Error);
                    }
                    self.execution = Some(ExecutionView::new(payload));
                }
                Err(err) => self.notice(
                    format!("Error al ejecutar código: {err}"),
                    NoticeKind::Error,
                ),
            }
        }

        let examples = self
            .pending_examples
            .as_ref()
            .and_then(|p| p.try_lock().ok())
            .and_then(|mut g| g.take());
        if let Some(result) = examples {
            self.pending_examples = None;
            match result {
                Ok(map) => {
                    debug!(count = map.len(), "examples fetched from server");
                    self.store = crate::examples_store::ExampleStore::from_server(map);
                }
                Err(err) => {
                    debug!(error = %err, "example fetch failed, using local set");
                    self.store = crate::examples_store::ExampleStore::local_fallback();
                    self.notice_for(
                        "Ejemplos cargados desde almacenamiento local",
                        NoticeKind::Info,
                        super::LONG_NOTICE_SECS,
                    );
                }
            }
            self.picker_index = 0;
        }

        let probe = self
            .pending_probe
            .as_ref()
            .and_then(|p| p.try_lock().ok())
            .and_then(|mut g| g.take());
        if let Some(up) = probe {
            self.pending_probe = None;
            self.online = Some(up);
        }
    }

    pub(crate) fn finish_analysis(&mut self, mut payload: AnalysisPayload) {
        self.busy = false;
        if let Some(error) = payload.error.take() {
            self.notice(error, NoticeKind::Error);
            return;
        }
        self.analysis = Some(payload);
        self.notice("Análisis completado", NoticeKind::Success);
    }

    /// Trim trailing whitespace on every line.
    pub(crate) fn format_document(&mut self) {
        if self.document.text.trim().is_empty() {
            self.notice("No hay código para formatear", NoticeKind::Error);
            return;
        }
        let trimmed = self.document.trim_line_ends();
        debug!(lines = trimmed, "trailing whitespace trimmed");
        self.notice("Código formateado", NoticeKind::Info);
    }

    /// Destination for a save: the buffer's own file, else `codigo.py` in
    /// the working directory.
    fn export_path(&self) -> PathBuf {
        self.document
            .filename
            .clone()
            .unwrap_or_else(|| PathBuf::from(files::EXPORT_FILENAME))
    }

    /// Write the buffer to its file, or to `codigo.py` when unnamed.
    pub(crate) fn save(&mut self) {
        if self.document.text.trim().is_empty() {
            self.notice("No hay código para guardar", NoticeKind::Error);
            return;
        }
        let path = self.export_path();
        match files::save_source_file(&path, &self.document.text) {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(files::EXPORT_FILENAME)
                    .to_string();
                self.document.filename = Some(path);
                self.document.modified = false;
                self.notice(format!("\"{name}\" {bytes}B guardado"), NoticeKind::Success);
            }
            Err(err) => self.notice(
                format!("Error al guardar: {err}"),
                NoticeKind::Error,
            ),
        }
    }

    /// Load the file named in the open prompt. On failure the prompt stays
    /// open so the path can be corrected.
    pub(crate) fn submit_open(&mut self) {
        let input = self.prompt_input.trim().to_string();
        if input.is_empty() {
            self.mode = UiMode::Edit;
            return;
        }
        let path = PathBuf::from(&input);
        match files::load_source_file(&path) {
            Ok(text) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(&input)
                    .to_string();
                self.document.load(text, Some(path));
                self.reset_result_state();
                self.prompt_input.clear();
                self.mode = UiMode::Edit;
                self.notice(format!("Archivo \"{name}\" cargado"), NoticeKind::Success);
            }
            Err(err) => self.notice(err.to_string(), NoticeKind::Error),
        }
    }

    pub(crate) fn load_selected_example(&mut self) {
        let Some(key) = self.store.key_at(self.picker_index).map(str::to_string) else {
            self.notice("Error cargando ejemplo", NoticeKind::Error);
            return;
        };
        let Some(code) = self.store.get(&key).map(str::to_string) else {
            self.notice("Error cargando ejemplo", NoticeKind::Error);
            return;
        };
        self.document.load(code, None);
        self.reset_result_state();
        self.mode = UiMode::Edit;
        self.notice(format!("Ejemplo \"{key}\" cargado"), NoticeKind::Success);
        if let Some(info) = self.store.info(&key) {
            self.notice_for(
                format!("{} · {}", info.title, info.difficulty),
                NoticeKind::Info,
                super::LONG_NOTICE_SECS,
            );
        }
    }

    /// First Ctrl+L arms the clear, a second press inside the window does it.
    pub(crate) fn request_clear(&mut self) {
        if self.document.text.trim().is_empty() {
            self.notice("El editor ya está vacío", NoticeKind::Info);
            return;
        }
        match self.clear_armed {
            Some(armed) if armed.elapsed() < super::CLEAR_CONFIRM_WINDOW => {
                self.clear_armed = None;
                self.document = Document::new();
                self.reset_result_state();
                self.notice("Editor limpiado", NoticeKind::Info);
            }
            _ => {
                self.clear_armed = Some(Instant::now());
                self.notice(
                    "Presiona Ctrl+L de nuevo para limpiar el editor",
                    NoticeKind::Info,
                );
            }
        }
    }

    fn reset_result_state(&mut self) {
        self.analysis = None;
        self.execution = None;
        self.scroll_row = 0;
        self.scroll_col = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::RcConfig;
    use std::time::Duration;

    fn test_controller() -> Controller {
        let runtime = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .unwrap(),
        );
        let api = ApiClient::new("http://127.0.0.1:1").unwrap();
        Controller::new(RcConfig::default(), api, runtime, Document::new())
    }

    #[test]
    fn analyze_refuses_empty_buffer() {
        let mut app = test_controller();
        app.document.insert_str("   \n\n");
        app.analyze();
        assert!(!app.busy);
        assert_eq!(app.notices[0].message, "Escribe código para analizar");
        assert_eq!(app.notices[0].kind, NoticeKind::Error);
    }

    #[test]
    fn execute_refuses_empty_buffer() {
        let mut app = test_controller();
        app.execute();
        assert!(app.pending_execution.is_none());
        assert_eq!(app.notices[0].message, "Escribe código para ejecutar");
    }

    #[test]
    fn analyze_is_ignored_while_busy() {
        let mut app = test_controller();
        app.document.insert_str("print(1)");
        app.busy = true;
        app.analyze();
        assert!(app.pending_analysis.is_none());
    }

    #[test]
    fn failed_example_fetch_falls_back_to_local_set() {
        let mut app = test_controller();
        app.api = ApiClient::with_backoff("http://127.0.0.1:1", Duration::from_millis(10)).unwrap();
        app.start_example_fetch();
        // Port 1 refuses connections, so the retries run their course and
        // the fallback path fires.
        let deadline = Instant::now() + Duration::from_secs(30);
        while app.pending_examples.is_some() && Instant::now() < deadline {
            app.check_pending_requests();
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(app.pending_examples.is_none());
        assert!(!app.store.is_from_server());
        assert!(app.store.len() >= 3);
        assert_eq!(
            app.notices[0].message,
            "Ejemplos cargados desde almacenamiento local"
        );
    }

    #[test]
    fn request_clear_needs_two_presses() {
        let mut app = test_controller();
        app.document.insert_str("x = 1");
        app.request_clear();
        assert_eq!(app.document.text, "x = 1");
        assert!(app.clear_armed.is_some());
        app.request_clear();
        assert!(app.document.text.is_empty());
        assert!(app.clear_armed.is_none());
    }

    #[test]
    fn request_clear_on_empty_editor_just_notices() {
        let mut app = test_controller();
        app.request_clear();
        assert!(app.clear_armed.is_none());
        assert_eq!(app.notices[0].message, "El editor ya está vacío");
    }

    #[test]
    fn save_writes_named_file_and_reports_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codigo.py");

        let mut app = test_controller();
        app.document.insert_str("print('hola')\n");
        app.document.filename = Some(path.clone());
        app.save();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "print('hola')\n");
        assert!(!app.document.modified);
        assert_eq!(app.notices[0].message, "\"codigo.py\" 14B guardado");
    }

    #[test]
    fn unnamed_buffer_exports_to_default_name() {
        let app = test_controller();
        assert_eq!(app.export_path(), PathBuf::from(files::EXPORT_FILENAME));
    }

    #[test]
    fn open_keeps_prompt_on_error() {
        let mut app = test_controller();
        app.mode = UiMode::OpenPrompt;
        app.prompt_input = "/definitely/not/here.py".to_string();
        app.submit_open();
        assert_eq!(app.mode, UiMode::OpenPrompt);
        assert_eq!(app.prompt_input, "/definitely/not/here.py");
        assert_eq!(app.notices[0].kind, NoticeKind::Error);
    }

    #[test]
    fn open_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nota.md");
        std::fs::write(&path, "# hola").unwrap();

        let mut app = test_controller();
        app.mode = UiMode::OpenPrompt;
        app.prompt_input = path.to_string_lossy().to_string();
        app.submit_open();
        assert_eq!(app.mode, UiMode::OpenPrompt);
        assert!(app.document.text.is_empty());
    }

    #[test]
    fn format_trims_trailing_whitespace() {
        let mut app = test_controller();
        app.document.load("x = 1   \ny = 2\t\nz = 3\n".to_string(), None);
        app.format_document();
        assert_eq!(app.document.text, "x = 1\ny = 2\nz = 3\n");
        assert_eq!(app.notices[0].message, "Código formateado");
        assert_eq!(app.notices[0].kind, NoticeKind::Info);
    }

    #[test]
    fn format_refuses_empty_buffer() {
        let mut app = test_controller();
        app.format_document();
        assert_eq!(app.notices[0].message, "No hay código para formatear");
        assert_eq!(app.notices[0].kind, NoticeKind::Error);
    }

    #[test]
    fn save_refuses_empty_buffer() {
        let mut app = test_controller();
        app.save();
        assert_eq!(app.notices[0].message, "No hay código para guardar");
        assert!(app.document.filename.is_none());
    }

    #[test]
    fn example_load_notices_key_and_details() {
        let mut app = test_controller();
        app.store = crate::examples_store::ExampleStore::local_fallback();
        app.picker_index = 0;
        app.load_selected_example();
        assert!(app.document.text.contains("calcular_factorial"));
        // Newest notice first: the 4-second details toast sits on top.
        assert_eq!(app.notices[0].message, "Función Básica · Principiante");
        assert_eq!(app.notices[1].message, "Ejemplo \"basic\" cargado");
    }

    #[test]
    fn example_load_with_no_examples_is_an_error_notice() {
        let mut app = test_controller();
        app.picker_index = 2;
        app.load_selected_example();
        assert_eq!(app.notices[0].message, "Error cargando ejemplo");
        assert_eq!(app.notices[0].kind, NoticeKind::Error);
    }
}
