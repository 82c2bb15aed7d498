use wordpack_llm::LlmError;
use wordpack_protocol::ErrorEnvelope;
use wordpack_synth::SynthError;

/// Map a failed command to the JSON error envelope printed on stdout.
pub fn envelope_for(err: &anyhow::Error) -> ErrorEnvelope {
    let message = format!("{err:#}");

    for cause in err.chain() {
        if let Some(synth) = cause.downcast_ref::<SynthError>() {
            return match synth {
                SynthError::InvalidConfig(_) | SynthError::TomlError(_) => {
                    ErrorEnvelope::new("invalid_config", message)
                        .with_hint("Check the TOML file passed to --config.")
                }
                SynthError::Upstream(LlmError::Config(_)) => llm_config(message),
                _ => ErrorEnvelope::new("store", message),
            };
        }
        if let Some(llm) = cause.downcast_ref::<LlmError>() {
            return match llm {
                LlmError::Config(_) => llm_config(message),
                _ => ErrorEnvelope::new("llm", message),
            };
        }
        if cause.downcast_ref::<serde_json::Error>().is_some() {
            return ErrorEnvelope::new("invalid_request", message).with_hint(
                "Expected {\"lemma\": \"...\"} with optional example_plan, regenerate_scope and previous.",
            );
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return ErrorEnvelope::new("io", message);
        }
    }

    ErrorEnvelope::new("internal", message)
}

fn llm_config(message: String) -> ErrorEnvelope {
    ErrorEnvelope::new("invalid_config", message)
        .with_hint("Set WORDPACK_LLM_MODE=offline to synthesize without a backend.")
}
