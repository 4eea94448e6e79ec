use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LANGUAGETOOL_URL: &str = "http://localhost:8081/v2/check";
pub const DEFAULT_DETECTOR_URL: &str =
    "https://api-inference.huggingface.co/models/openai-community/roberta-base-openai-detector";

/// Runtime settings. Every flag falls back to an environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "server", about = "Grammar, plagiarism and AI-text checking API")]
pub struct Settings {
    /// Host to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,
    /// Port to bind
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,
    /// Grammar-check endpoint (LanguageTool `/v2/check`)
    #[arg(long, env = "LANGUAGETOOL_URL", default_value = DEFAULT_LANGUAGETOOL_URL)]
    pub languagetool_url: String,
    /// Timeout for grammar-check requests, in seconds
    #[arg(long, env = "LANGUAGETOOL_TIMEOUT_SECS", default_value_t = 30)]
    pub languagetool_timeout_secs: u64,
    /// Text-classification inference endpoint used for AI-text detection
    #[arg(long, env = "AI_DETECTOR_URL", default_value = DEFAULT_DETECTOR_URL)]
    pub detector_url: String,
    /// Bearer token for the inference endpoint
    #[arg(long, env = "AI_DETECTOR_TOKEN")]
    pub detector_token: Option<String>,
    /// Timeout for inference requests, in seconds
    #[arg(long, env = "AI_DETECTOR_TIMEOUT_SECS", default_value_t = 60)]
    pub detector_timeout_secs: u64,
    /// JSON file with `[{"id": ..., "text": ...}]` reference documents; built-in corpus when unset
    #[arg(long, env = "CORPUS_PATH")]
    pub corpus: Option<PathBuf>,
    /// Allowed CORS origins, comma separated; any origin when unset
    #[arg(long, env = "CORS_ALLOW_ORIGIN", value_delimiter = ',')]
    pub cors_allow_origin: Vec<String>,
}

impl Settings {
    pub fn languagetool_timeout(&self) -> Duration { Duration::from_secs(self.languagetool_timeout_secs) }

    pub fn detector_timeout(&self) -> Duration { Duration::from_secs(self.detector_timeout_secs) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let s = Settings::parse_from([
            "server",
            "--port",
            "9000",
            "--languagetool-url",
            "http://lt:8010/v2/check",
            "--cors-allow-origin",
            "http://a.test,http://b.test",
        ]);
        assert_eq!(s.port, 9000);
        assert_eq!(s.languagetool_url, "http://lt:8010/v2/check");
        assert_eq!(s.cors_allow_origin, vec!["http://a.test", "http://b.test"]);
        assert_eq!(s.languagetool_timeout(), Duration::from_secs(30));
    }
}
