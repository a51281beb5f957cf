//! Result verifiers used by the tool invoker.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::{EngineError, Result},
    models::{ChatMessage, ToolConfig},
    prompts,
    services::{CompletionOptions, LanguageModel, ResultVerifier, Verification},
};

/// Classifies results by their own status markers.
///
/// An object whose `status` is `failure`, `failed` or `error`, or that
/// carries a non-null `error`, is a failure. Anything else succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusVerifier;

#[async_trait]
impl ResultVerifier for StatusVerifier {
    async fn verify(&self, _config: &ToolConfig, result: &Value) -> Result<Verification> {
        Ok(classify_by_status(result))
    }
}

fn classify_by_status(result: &Value) -> Verification {
    let Some(object) = result.as_object() else {
        return Verification::Success;
    };

    let failed_status = object
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|status| {
            matches!(
                status.to_ascii_lowercase().as_str(),
                "failure" | "failed" | "error"
            )
        });
    let has_error = object.get("error").is_some_and(|error| !error.is_null());

    if failed_status || has_error {
        Verification::Failure
    } else {
        Verification::Success
    }
}

/// Lets the language model judge whether a result accomplished the method.
#[derive(Clone)]
pub struct ModelVerifier {
    model: Arc<dyn LanguageModel>,
    model_name: String,
}

impl ModelVerifier {
    pub fn new(model: Arc<dyn LanguageModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }
}

#[async_trait]
impl ResultVerifier for ModelVerifier {
    async fn verify(&self, config: &ToolConfig, result: &Value) -> Result<Verification> {
        // Obvious failures never reach the model.
        if classify_by_status(result) == Verification::Failure {
            return Ok(Verification::Failure);
        }

        let prompt = vec![ChatMessage::user(prompts::result_verification(
            config, result,
        ))];
        let reply = self
            .model
            .complete(&prompt, &self.model_name, &CompletionOptions::deterministic())
            .await?;

        let answer = reply.trim().trim_matches(|c: char| !c.is_alphanumeric());
        match answer.to_ascii_lowercase().as_str() {
            "success" => Ok(Verification::Success),
            "failure" => Ok(Verification::Failure),
            _ => Err(EngineError::malformed("verifying tool result", reply)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config() -> ToolConfig {
        ToolConfig {
            tool: "weather".to_string(),
            method: "today".to_string(),
            description: None,
            inputs: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_status_verifier() {
        let verifier = StatusVerifier;
        let cases = [
            (json!({"temperature": 21}), Verification::Success),
            (json!("plain text output"), Verification::Success),
            (json!({"status": "ok"}), Verification::Success),
            (json!({"status": "FAILED"}), Verification::Failure),
            (json!({"status": "failure"}), Verification::Failure),
            (json!({"error": "timeout"}), Verification::Failure),
            (json!({"error": null, "data": 1}), Verification::Success),
        ];
        for (result, expected) in cases {
            assert_eq!(
                verifier.verify(&config(), &result).await.unwrap(),
                expected,
                "{result}"
            );
        }
    }

    struct Reply(&'static str);

    #[async_trait]
    impl LanguageModel for Reply {
        async fn complete(
            &self,
            _prompt: &[ChatMessage],
            _model: &str,
            _options: &CompletionOptions,
        ) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_model_verifier_reads_one_word() {
        let verifier = ModelVerifier::new(Arc::new(Reply(" Success.\n")), "m");
        assert_eq!(
            verifier.verify(&config(), &json!({"t": 1})).await.unwrap(),
            Verification::Success
        );

        let verifier = ModelVerifier::new(Arc::new(Reply("perhaps")), "m");
        assert!(verifier.verify(&config(), &json!({"t": 1})).await.is_err());
    }
}
