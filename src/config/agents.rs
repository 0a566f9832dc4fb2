//! Project instructions from `AGENTS.md`, appended to the system prompt.

use std::path::Path;

use super::types::{Config, SystemPrompt};

const WRAPPER_PREFIX: &str = "<system-reminder>\
As you answer the user's questions, you can use the following context.\n\n\
Codebase and user instructions are shown below. \
Be sure to adhere to these instructions.\n\n\
IMPORTANT: These instructions OVERRIDE any default behavior \
and you MUST follow them as written.\n\n";

const WRAPPER_SUFFIX: &str = "\n</system-reminder>";

impl Config {
    /// Appends `dir/AGENTS.md`, wrapped in a system reminder, to the system prompt.
    ///
    /// A missing, unreadable or empty file leaves the prompt untouched.
    pub fn append_agents_file(&mut self, dir: &Path) {
        let path = dir.join(crate::constants::AGENTS_FILENAME);
        if !path.is_file() {
            return;
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read AGENTS.md");
                return;
            }
        };
        if content.is_empty() {
            return;
        }

        let wrapped = format!("{WRAPPER_PREFIX}{content}{WRAPPER_SUFFIX}");
        self.system_prompt = Some(match self.system_prompt.take() {
            Some(existing) => SystemPrompt::new(format!("{}\n{}", existing, wrapped)),
            None => SystemPrompt::new(wrapped),
        });
        tracing::debug!(path = %path.display(), "appended AGENTS.md to system prompt");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{ApiKey, MaxTokens, ModelId};

    fn config(system_prompt: Option<&str>) -> Config {
        Config {
            api_key: ApiKey::new("k"),
            model: ModelId::new("m"),
            max_tokens: MaxTokens::new(10).unwrap(),
            system_prompt: system_prompt.map(SystemPrompt::new),
            temperature: None,
            base_url: "http://localhost".into(),
            show_config: false,
        }
    }

    #[test]
    fn test_no_agents_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(Some("base"));
        cfg.append_agents_file(dir.path());
        assert_eq!(cfg.system_prompt.unwrap().as_str(), "base");
    }

    #[test]
    fn test_agents_file_becomes_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("AGENTS.md"), "Use tabs.").unwrap();
        let mut cfg = config(None);
        cfg.append_agents_file(dir.path());
        let prompt = cfg.system_prompt.unwrap();
        assert!(prompt.as_str().starts_with("<system-reminder>"));
        assert!(prompt.as_str().contains("Use tabs."));
        assert!(prompt.as_str().ends_with("</system-reminder>"));
    }

    #[test]
    fn test_agents_file_appended_after_existing_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("AGENTS.md"), "Run tests first.").unwrap();
        let mut cfg = config(Some("Be concise"));
        cfg.append_agents_file(dir.path());
        let prompt = cfg.system_prompt.unwrap();
        assert!(prompt.as_str().starts_with("Be concise\n<system-reminder>"));
    }

    #[test]
    fn test_empty_agents_file_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("AGENTS.md"), "").unwrap();
        let mut cfg = config(None);
        cfg.append_agents_file(dir.path());
        assert!(cfg.system_prompt.is_none());
    }
}
