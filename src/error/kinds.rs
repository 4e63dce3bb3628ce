use std::{fmt, io};

/// Crate-wide `Result` type using [`AutosuggestError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, AutosuggestError>;

/// Top-level error type for autosuggest operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum AutosuggestError {
    /// The confirmed part of the input could not be tokenized.
    Lexical(LexicalError),

    /// The confirmed tokens have no path through the syntax network.
    NoViableParse(NoViableParse),

    /// Building a grammar failed.
    Grammar(GrammarError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Line editor errors.
    Readline(String),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Unrecognized character sequence before the trailing fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalError {
    /// Byte offset where no token could be matched.
    pub position: usize,

    /// The offending text, truncated for display.
    pub snippet: String,
}

/// The confirmed token sequence is not a valid prefix of the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoViableParse {
    /// Index of the first token no configuration could consume.
    pub index: usize,

    /// Source text of that token.
    pub text: String,

    /// Display name of that token's kind.
    pub kind: String,
}

/// Internal safety limit hit while exploring a closure.
///
/// Never fatal: the exploration is truncated and the request goes on with
/// what was found so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorationBoundExceeded {
    /// Configured maximum number of configurations per closure.
    pub limit: usize,

    /// Number of configurations explored when the bound was hit.
    pub explored: usize,
}

/// Grammar construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// Two tokens share a name.
    DuplicateToken(String),

    /// Two fragments (or a fragment and a token) share a name.
    DuplicateFragment(String),

    /// Two syntax rules share a name.
    DuplicateRule(String),

    /// A syntax rule references a token that is not defined.
    UndefinedToken { rule: String, token: String },

    /// A syntax rule references a rule that is not defined.
    UndefinedRule { rule: String, reference: String },

    /// A lexical rule references a fragment that is not defined.
    UndefinedFragment { token: String, fragment: String },

    /// No start rule was designated.
    MissingStartRule,

    /// The designated start rule is not defined.
    UnknownStartRule(String),

    /// A token can match the empty string.
    EmptyToken(String),

    /// A character class could not be parsed.
    InvalidCharClass { class: String, reason: String },

    /// A grammar definition file could not be read.
    InvalidDefinition(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for AutosuggestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutosuggestError::Lexical(e) => write!(f, "{e}"),
            AutosuggestError::NoViableParse(e) => write!(f, "{e}"),
            AutosuggestError::Grammar(e) => write!(f, "Grammar error: {e}"),
            AutosuggestError::Config(e) => write!(f, "Configuration error: {e}"),
            AutosuggestError::Io(e) => write!(f, "I/O error: {e}"),
            AutosuggestError::Readline(msg) => write!(f, "Readline error: {msg}"),
            AutosuggestError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexical error at offset {}: unrecognized input '{}'",
            self.position, self.snippet
        )
    }
}

impl fmt::Display for NoViableParse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No viable parse at token {}: unexpected {} '{}'",
            self.index, self.kind, self.text
        )
    }
}

impl fmt::Display for ExplorationBoundExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Exploration bound exceeded: {} configurations explored (limit {})",
            self.explored, self.limit
        )
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::DuplicateToken(name) => write!(f, "Duplicate token: {name}"),
            GrammarError::DuplicateFragment(name) => write!(f, "Duplicate fragment: {name}"),
            GrammarError::DuplicateRule(name) => write!(f, "Duplicate rule: {name}"),
            GrammarError::UndefinedToken { rule, token } => {
                write!(f, "Rule '{rule}' references undefined token '{token}'")
            }
            GrammarError::UndefinedRule { rule, reference } => {
                write!(f, "Rule '{rule}' references undefined rule '{reference}'")
            }
            GrammarError::UndefinedFragment { token, fragment } => {
                write!(f, "Token '{token}' references undefined fragment '{fragment}'")
            }
            GrammarError::MissingStartRule => write!(f, "No start rule designated"),
            GrammarError::UnknownStartRule(name) => write!(f, "Unknown start rule: {name}"),
            GrammarError::EmptyToken(name) => {
                write!(f, "Token '{name}' matches the empty string")
            }
            GrammarError::InvalidCharClass { class, reason } => {
                write!(f, "Invalid character class '{class}': {reason}")
            }
            GrammarError::InvalidDefinition(msg) => {
                write!(f, "Invalid grammar definition: {msg}")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for AutosuggestError {}
impl std::error::Error for LexicalError {}
impl std::error::Error for NoViableParse {}
impl std::error::Error for ExplorationBoundExceeded {}
impl std::error::Error for GrammarError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to AutosuggestError ========================= */

impl From<io::Error> for AutosuggestError {
    fn from(err: io::Error) -> Self {
        AutosuggestError::Io(err)
    }
}

impl From<LexicalError> for AutosuggestError {
    fn from(err: LexicalError) -> Self {
        AutosuggestError::Lexical(err)
    }
}

impl From<NoViableParse> for AutosuggestError {
    fn from(err: NoViableParse) -> Self {
        AutosuggestError::NoViableParse(err)
    }
}

impl From<GrammarError> for AutosuggestError {
    fn from(err: GrammarError) -> Self {
        AutosuggestError::Grammar(err)
    }
}

impl From<ConfigError> for AutosuggestError {
    fn from(err: ConfigError) -> Self {
        AutosuggestError::Config(err)
    }
}

impl From<reedline::ReedlineError> for AutosuggestError {
    fn from(err: reedline::ReedlineError) -> Self {
        AutosuggestError::Readline(err.to_string())
    }
}

impl From<String> for AutosuggestError {
    fn from(msg: String) -> Self {
        AutosuggestError::Generic(msg)
    }
}

impl From<&str> for AutosuggestError {
    fn from(msg: &str) -> Self {
        AutosuggestError::Generic(msg.to_owned())
    }
}
