use thiserror::Error;

#[derive(Error, Debug)]
pub enum WhaleError {
    // Configuration errors
    #[error("Invalid config: {message}")]
    ConfigValidation { message: String },

    #[error("Invalid API base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    // REST API errors
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API returned {status} for {endpoint}")]
    Api { endpoint: String, status: u16 },

    #[error("Not authorized for {endpoint} (status {status})")]
    Unauthorized { endpoint: String, status: u16 },

    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    // Model errors
    #[error("Unknown species code: {code}")]
    UnknownSpecies { code: u8 },

    #[error("Unknown orca type code: {code}")]
    UnknownOrcaType { code: u8 },

    // View errors
    #[error("Only administrators can review sightings")]
    NotAdmin,

    #[error("Sighting {id} is not on the current page")]
    SightingNotDisplayed { id: i64 },

    // Generic errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl WhaleError {
    /// Map a non-success status to the matching error variant
    pub fn from_status(endpoint: &str, status: u16) -> Self {
        match status {
            401 | 403 => WhaleError::Unauthorized {
                endpoint: endpoint.to_string(),
                status,
            },
            _ => WhaleError::Api {
                endpoint: endpoint.to_string(),
                status,
            },
        }
    }

    /// Short text suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            WhaleError::Unauthorized { .. } | WhaleError::NotAdmin => {
                "You are not allowed to do that.".to_string()
            }
            WhaleError::Transport { .. } => "Could not reach the sightings service.".to_string(),
            _ => "Something went wrong, please try again.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WhaleError>;
