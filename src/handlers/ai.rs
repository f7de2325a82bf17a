use anyhow::{Result, anyhow};
use ollama_rs::{
    Ollama, generation::completion::request::GenerationRequest, models::ModelOptions,
};

/// Result of summarizing a note: a short summary plus a comma-separated
/// list of key topics.
#[derive(Debug, Clone)]
pub struct NoteSummary {
    pub summary: String,
    pub key_topics: String,
}

const KEY_TOPICS_MARKER: &str = "Key topics:";

/// Names of the models available on the local Ollama instance.
pub async fn available_models() -> Result<Vec<String>> {
    let ollama = Ollama::default();
    let models = ollama
        .list_local_models()
        .await
        .map_err(|e| anyhow!("Failed to list Ollama models: {e}"))?;
    Ok(models.iter().map(|model| model.name.clone()).collect())
}

/// Picks the first locally available model.
pub async fn default_model() -> Result<String> {
    let models = available_models().await?;
    models
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No models found"))
}

/// Summarizes a note's content. Blank content is rejected before any call
/// is made; a failed call surfaces as an error and leaves nothing behind.
pub async fn summarize_note(model: &str, content: &str) -> Result<NoteSummary> {
    if content.trim().is_empty() {
        return Err(anyhow!("Cannot summarize an empty note"));
    }

    let prompt = format!(
        "Summarize the following note in one short paragraph. Then, on a final \
         line starting with '{KEY_TOPICS_MARKER}', list its key topics separated \
         by commas.\n\n{content}"
    );

    let ollama = Ollama::default();
    let options = ModelOptions::default().temperature(0.3).num_predict(1024);
    let request = GenerationRequest::new(model.to_string(), prompt).options(options);
    let response = ollama
        .generate(request)
        .await
        .map_err(|e| anyhow!("Summarization failed: {e}"))?;

    Ok(split_summary(&response.response))
}

/// Rewrites a note's content, optionally in a requested tone.
pub async fn rewrite_note(model: &str, content: &str, tone: Option<&str>) -> Result<String> {
    if content.trim().is_empty() {
        return Err(anyhow!("Cannot rewrite an empty note"));
    }

    let prompt = match tone {
        Some(tone) => format!(
            "Rewrite the following note in a {tone} tone. Return only the \
             rewritten note.\n\n{content}"
        ),
        None => format!(
            "Rewrite the following note to be clearer and better organized. \
             Return only the rewritten note.\n\n{content}"
        ),
    };

    let ollama = Ollama::default();
    let options = ModelOptions::default().temperature(0.7).num_predict(2048);
    let request = GenerationRequest::new(model.to_string(), prompt).options(options);
    let response = ollama
        .generate(request)
        .await
        .map_err(|e| anyhow!("Rewrite failed: {e}"))?;

    let rewritten = response.response.trim().to_string();
    if rewritten.is_empty() {
        return Err(anyhow!("The model returned an empty rewrite"));
    }
    Ok(rewritten)
}

/// Splits the model's raw output into summary text and the trailing key
/// topics line. Output without the marker becomes a summary with no topics.
fn split_summary(raw: &str) -> NoteSummary {
    match raw.rfind(KEY_TOPICS_MARKER) {
        Some(index) => {
            let summary = raw[..index].trim().to_string();
            let key_topics = raw[index + KEY_TOPICS_MARKER.len()..].trim().to_string();
            NoteSummary {
                summary,
                key_topics,
            }
        }
        None => NoteSummary {
            summary: raw.trim().to_string(),
            key_topics: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_summary_and_topics() {
        let parsed = split_summary(
            "A short note about shopping.\n\nKey topics: groceries, errands",
        );
        assert_eq!(parsed.summary, "A short note about shopping.");
        assert_eq!(parsed.key_topics, "groceries, errands");
    }

    #[test]
    fn output_without_marker_is_all_summary() {
        let parsed = split_summary("Just a summary, no topics line.");
        assert_eq!(parsed.summary, "Just a summary, no topics line.");
        assert!(parsed.key_topics.is_empty());
    }
}
