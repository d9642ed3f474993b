use std::fmt;

use crate::domain::DomainError;

/// Zhipu's OpenAI-compatible endpoint used by the reference deployment.
pub const DEFAULT_ENDPOINT: &str = "https://open.bigmodel.cn/api/paas/v4";
/// Free-tier model of the reference deployment.
pub const DEFAULT_MODEL: &str = "glm-4-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 1.0;

/// Connection parameters for the remote chat-completion model.
///
/// The credential travels with the config rather than living in process-wide
/// state: surfaces collect it interactively and attach it per request through
/// [`ClientConfig::with_api_key`]. `Debug` never prints it.
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    endpoint: String,
    model_id: String,
    api_key: String,
    temperature: f32,
}

impl ClientConfig {
    pub fn new(
        endpoint: impl Into<String>,
        model_id: impl Into<String>,
        api_key: impl Into<String>,
        temperature: f32,
    ) -> Result<Self, DomainError> {
        validate_temperature(temperature)?;

        let endpoint: String = endpoint.into();
        let endpoint = endpoint.trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(DomainError::invalid_input("endpoint must not be empty"));
        }

        let model_id: String = model_id.into();
        if model_id.trim().is_empty() {
            return Err(DomainError::invalid_input("model id must not be empty"));
        }

        Ok(Self {
            endpoint,
            model_id,
            api_key: api_key.into(),
            temperature,
        })
    }

    /// Same connection parameters, different credential.
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..self.clone()
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Fails with [`DomainError::Authentication`] when no credential is attached.
    pub fn require_credential(&self) -> Result<(), DomainError> {
        if self.has_credential() {
            Ok(())
        } else {
            Err(DomainError::authentication("API key is missing"))
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model_id: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.api_key.is_empty() {
            "<none>"
        } else {
            "<redacted>"
        };
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("model_id", &self.model_id)
            .field("api_key", &key)
            .field("temperature", &self.temperature)
            .finish()
    }
}

fn validate_temperature(temperature: f32) -> Result<(), DomainError> {
    if (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
        Ok(())
    } else {
        Err(DomainError::invalid_input(format!(
            "temperature {temperature} outside [{MIN_TEMPERATURE}, {MAX_TEMPERATURE}]"
        )))
    }
}
