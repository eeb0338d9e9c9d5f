use thiserror::Error;

/// User-facing failure of a weather search. `Display` is the message shown in the error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// The configured API key is missing or too short to be real.
    #[error("Please add your WeatherAPI.com API key to use this feature")]
    Credential,

    /// The API answered with a non-success status for the query.
    #[error("City not found. Please check the spelling and try again.")]
    CityNotFound,

    /// Transport failure or a response that did not parse.
    #[error("Failed to fetch weather data. Please try again.")]
    LookupFailed,
}
