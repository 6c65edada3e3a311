use serde::Deserialize;

/// Severity of one feedback entry. Anything the server sends outside the
/// known set is treated as informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum FeedbackKind {
    Error,
    Warning,
    Success,
    #[default]
    Info,
}

impl From<String> for FeedbackKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "error" => FeedbackKind::Error,
            "warning" => FeedbackKind::Warning,
            "success" => FeedbackKind::Success,
            _ => FeedbackKind::Info,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackItem {
    #[serde(rename = "tipo", default)]
    pub kind: FeedbackKind,
    #[serde(rename = "mensaje", default)]
    pub message: String,
}

/// Static metrics reported per analysis. The wire names are Spanish.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Metrics {
    #[serde(rename = "lineas_codigo", default)]
    pub code_lines: u32,
    #[serde(rename = "funciones", default)]
    pub functions: u32,
    #[serde(rename = "clases", default)]
    pub classes: u32,
    #[serde(rename = "complejidad", default)]
    pub complexity: u32,
}

/// Response body of an analysis request. The server reports either a scored
/// result or a top-level `error`; every field defaults so both shapes parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisPayload {
    #[serde(default)]
    pub score: f64,
    #[serde(rename = "metricas", default)]
    pub metrics: Metrics,
    #[serde(default)]
    pub feedback: Vec<FeedbackItem>,
    #[serde(rename = "sugerencias", default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of an execution request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionPayload {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// One-line verdict for a score, shown under the gauge.
pub fn quality_message(score: f64) -> &'static str {
    if score >= 90.0 {
        "Excelente calidad de código"
    } else if score >= 70.0 {
        "Buena calidad de código"
    } else if score >= 50.0 {
        "Calidad moderada"
    } else if score >= 30.0 {
        "Necesita mejoras"
    } else {
        "Requiere trabajo significativo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_parses_wire_names() {
        let raw = r#"{
            "score": 85.5,
            "metricas": {"lineas_codigo": 12, "funciones": 2, "clases": 1, "complejidad": 4},
            "feedback": [
                {"tipo": "warning", "mensaje": "Funciones sin docstring"},
                {"tipo": "success", "mensaje": "Buen uso de nombres"}
            ],
            "sugerencias": ["Agrega docstrings"]
        }"#;
        let payload: AnalysisPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.score, 85.5);
        assert_eq!(payload.metrics.code_lines, 12);
        assert_eq!(payload.metrics.functions, 2);
        assert_eq!(payload.metrics.classes, 1);
        assert_eq!(payload.metrics.complexity, 4);
        assert_eq!(payload.feedback.len(), 2);
        assert_eq!(payload.feedback[0].kind, FeedbackKind::Warning);
        assert_eq!(payload.feedback[1].message, "Buen uso de nombres");
        assert_eq!(payload.suggestions, vec!["Agrega docstrings"]);
        assert!(payload.error.is_none());
    }

    #[test]
    fn test_analysis_error_shape_parses() {
        let payload: AnalysisPayload =
            serde_json::from_str(r#"{"error": "Código vacío"}"#).unwrap();
        assert_eq!(payload.error.as_deref(), Some("Código vacío"));
        assert_eq!(payload.score, 0.0);
        assert!(payload.feedback.is_empty());
    }

    #[test]
    fn test_missing_fields_default() {
        let payload: AnalysisPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.score, 0.0);
        assert_eq!(payload.metrics.code_lines, 0);
        assert!(payload.suggestions.is_empty());
    }

    #[test]
    fn test_unknown_feedback_kind_is_info() {
        let item: FeedbackItem =
            serde_json::from_str(r#"{"tipo": "nota", "mensaje": "x"}"#).unwrap();
        assert_eq!(item.kind, FeedbackKind::Info);
    }

    #[test]
    fn test_execution_payloads() {
        let ok: ExecutionPayload =
            serde_json::from_str(r#"{"success": true, "output": "hola\n"}"#).unwrap();
        assert!(ok.success);
        assert_eq!(ok.output, "hola\n");

        let failed: ExecutionPayload =
            serde_json::from_str(r#"{"success": false, "error": "NameError: x"}"#).unwrap();
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("NameError: x"));
    }

    #[test]
    fn test_quality_message_thresholds() {
        assert_eq!(quality_message(100.0), "Excelente calidad de código");
        assert_eq!(quality_message(90.0), "Excelente calidad de código");
        assert_eq!(quality_message(89.9), "Buena calidad de código");
        assert_eq!(quality_message(70.0), "Buena calidad de código");
        assert_eq!(quality_message(50.0), "Calidad moderada");
        assert_eq!(quality_message(30.0), "Necesita mejoras");
        assert_eq!(quality_message(0.0), "Requiere trabajo significativo");
    }
}
