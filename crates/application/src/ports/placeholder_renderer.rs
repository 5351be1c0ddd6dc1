/// Renders a deterministic substitute image for a title.
pub trait PlaceholderRenderer: Send + Sync {
    /// Same title, same output.
    fn render(&self, title: &str) -> String;
}
