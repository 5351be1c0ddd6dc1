use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageParams {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}
