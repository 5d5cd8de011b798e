use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use log::info;

pub const COOKING_SYSTEM_PROMPT: &str = "You are a helpful cooking assistant and recipe provider. You specialize in:
- Providing detailed cooking recipes with ingredients and step-by-step instructions
- Answering cooking techniques and tips questions
- Suggesting recipe modifications for dietary restrictions
- Helping with meal planning and ingredient substitutions
- Explaining cooking terminology and methods

Always provide clear, practical advice. When providing recipes:
1. List all ingredients with measurements
2. Provide step-by-step instructions
3. Include cooking times and temperatures
4. Add helpful tips or variations
5. Mention difficulty level and serving size

Be friendly, encouraging, and make cooking accessible for all skill levels.";

#[derive(Debug)]
pub enum PromptError {
    EmptyPrompt(String),
    IoError(std::io::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::EmptyPrompt(path) => write!(f, "System prompt file '{}' is empty", path),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

/// Built-in cooking prompt, or the trimmed contents of `path` when given.
pub fn load_system_prompt<P: AsRef<Path>>(path: Option<P>) -> Result<String, PromptError> {
    let Some(path) = path else {
        return Ok(COOKING_SYSTEM_PROMPT.to_string());
    };
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let prompt = content.trim();
    if prompt.is_empty() {
        return Err(PromptError::EmptyPrompt(path.display().to_string()));
    }
    info!("Loaded system prompt from {} ({} chars)", path.display(), prompt.len());
    Ok(prompt.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_to_cooking_prompt() {
        let prompt = load_system_prompt(None::<&str>).unwrap();
        assert!(prompt.starts_with("You are a helpful cooking assistant"));
    }

    #[test]
    fn file_overrides_and_is_trimmed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "\n  You only talk about bread.  \n").unwrap();
        let prompt = load_system_prompt(Some(file.path())).unwrap();
        assert_eq!(prompt, "You only talk about bread.");
    }

    #[test]
    fn blank_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "   ").unwrap();
        let err = load_system_prompt(Some(file.path())).unwrap_err();
        assert!(matches!(err, PromptError::EmptyPrompt(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_system_prompt(Some("/nonexistent/prompt.txt")).unwrap_err();
        assert!(matches!(err, PromptError::IoError(_)));
        assert!(err.source().is_some());
    }
}
