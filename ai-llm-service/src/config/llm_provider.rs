/// Backend used for model inference.
///
/// Only a local Ollama runtime is wired today. New providers are added by
/// extending this enum together with a service under `services/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime.
    Ollama,
}
