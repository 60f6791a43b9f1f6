/// A request to be sent to the model provider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelRequest {
    /// The input messages.
    pub messages: Vec<ModelMessage>,
    /// Upper bound of generated tokens, provider default when `None`.
    pub max_tokens: Option<u32>,
    /// Sampling temperature, provider default when `None`.
    pub temperature: Option<f32>,
}

impl ModelRequest {
    /// Creates a request with a system instruction and a single user turn.
    pub fn with_prompt<S, U>(system: S, user: U) -> Self
    where
        S: Into<String>,
        U: Into<String>,
    {
        Self {
            messages: vec![
                ModelMessage::System(system.into()),
                ModelMessage::User(user.into()),
            ],
            max_tokens: None,
            temperature: None,
        }
    }

    /// Returns the text of the last user message, if any.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|msg| match msg {
            ModelMessage::User(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A complete message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelMessage {
    /// The system instructions.
    System(String),
    /// A user input text.
    User(String),
    /// An assistant text.
    Assistant(String),
}
