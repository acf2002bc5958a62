//! Customer intent value object

use std::fmt;

/// All intents, in detection priority order
pub const ALL_INTENTS: &[Intent] = &[
    Intent::Greeting,
    Intent::Balance,
    Intent::Transfer,
    Intent::Card,
    Intent::Loan,
    Intent::Hours,
    Intent::Fallback,
];

/// What the caller is asking the teller about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Intent {
    Greeting,
    Balance,
    Transfer,
    Card,
    Loan,
    Hours,
    #[default]
    Fallback,
}

impl Intent {
    /// Lowercase words or phrases that select this intent
    pub const fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Greeting => &["hello", "hi", "hey", "good morning", "good afternoon"],
            Self::Balance => &["balance", "how much money", "funds", "statement"],
            Self::Transfer => &["transfer", "transfers", "send money", "wire", "payment", "pay"],
            Self::Card => &["card", "cards", "lost", "stolen", "pin"],
            Self::Loan => &["loan", "loans", "mortgage", "credit", "borrow"],
            Self::Hours => &["hours", "open", "closed", "branch"],
            Self::Fallback => &[],
        }
    }

    /// Built-in reply; `{institution}` is replaced with the persona's name
    pub const fn default_reply(&self) -> &'static str {
        match self {
            Self::Greeting => "Hello and welcome to {institution}. How can I help you with your accounts today?",
            Self::Balance => "I can help with that. For your security, {institution} shows balances only after you sign in to online banking or visit a branch with photo ID.",
            Self::Transfer => "Transfers can be set up in the {institution} app under Payments. Transfers between your own accounts are free and arrive instantly.",
            Self::Card => "If your card is lost or stolen, {institution} can block it right away. Please call the number on the back of any statement and we will send a replacement.",
            Self::Loan => "{institution} offers personal loans and mortgages. A loan advisor can walk you through rates and eligibility at any branch.",
            Self::Hours => "Most {institution} branches are open Monday to Friday, 9am to 5pm, and Saturday mornings.",
            Self::Fallback => "Thank you for contacting {institution}. Could you tell me a little more about what you need help with?",
        }
    }

    /// Config key suffix for this intent's reply
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Balance => "balance",
            Self::Transfer => "transfer",
            Self::Card => "card",
            Self::Loan => "loan",
            Self::Hours => "hours",
            Self::Fallback => "fallback",
        }
    }

    /// Pick the first intent with a keyword among the utterance's words.
    ///
    /// Keywords match whole words, so "they" does not count as "hey".
    /// Phrases match consecutive words.
    pub fn detect(utterance: &str) -> Self {
        let lowered = utterance.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let text = format!(" {} ", words.join(" "));

        ALL_INTENTS
            .iter()
            .copied()
            .find(|intent| {
                intent
                    .keywords()
                    .iter()
                    .any(|k| text.contains(&format!(" {} ", k)))
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
