use serde::Deserialize;

/// Query parameters of the platform's one-time verification handshake.
/// All fields are optional so a bare `GET /webhook` still reaches the
/// handler and gets a 403 instead of an extractor rejection.
#[derive(Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    #[serde(default)]
    pub mode: Option<String>,

    #[serde(rename = "hub.verify_token")]
    #[serde(default)]
    pub verify_token: Option<String>,

    #[serde(rename = "hub.challenge")]
    #[serde(default)]
    pub challenge: Option<String>,
}
impl VerifyParams {
    /// The challenge to echo back, if the handshake checks out.
    pub fn challenge_response(&self, expected_token: &str) -> Option<&str> {
        if self.mode.as_deref() != Some("subscribe") {
            return None;
        }
        if self.verify_token.as_deref() != Some(expected_token) {
            return None;
        }
        self.challenge.as_deref()
    }
}
